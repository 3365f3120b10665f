//! Membership watcher.
//!
//! Turns a voice state change into the occupancy of the channel it affects. The
//! watcher only reads the guild as the cache holds it at the moment of the event; it
//! keeps no state of its own, so the bot's presence is always recomputed.

use serenity::all::{ChannelId, ChannelType, Guild, UserId, VoiceState};

use crate::model::occupancy::ChannelOccupancy;

pub struct MembershipWatcher {
    bot_user_id: UserId,
}

impl MembershipWatcher {
    /// # Arguments
    /// - `bot_user_id` - This bot's own user, counted as present but never as a member
    pub fn new(bot_user_id: UserId) -> Self {
        Self { bot_user_id }
    }

    /// Classifies a before/after voice state pair.
    ///
    /// The affected channel is the new one if the user is now in a channel, otherwise
    /// the one they left.
    ///
    /// # Returns
    /// - `Some(ChannelOccupancy)` - The affected channel is a voice channel of `guild`
    /// - `None` - Neither state references a channel, or it is not a voice channel
    pub fn observe(
        &self,
        guild: &Guild,
        old: Option<&VoiceState>,
        new: &VoiceState,
    ) -> Option<ChannelOccupancy> {
        let channel_id = new
            .channel_id
            .or_else(|| old.and_then(|state| state.channel_id))?;

        self.occupancy(guild, channel_id)
    }

    /// Counts who is connected to a voice channel of `guild` right now.
    pub fn occupancy(&self, guild: &Guild, channel_id: ChannelId) -> Option<ChannelOccupancy> {
        let channel = guild.channels.get(&channel_id)?;
        if channel.kind != ChannelType::Voice {
            tracing::debug!(
                "Ignoring non-voice channel {} (type: {:?}) in guild {}",
                channel.name,
                channel.kind,
                guild.id
            );
            return None;
        }

        let mut total_member_count = 0;
        let mut non_bot_member_count = 0;
        let mut bot_present = false;

        for state in guild
            .voice_states
            .values()
            .filter(|state| state.channel_id == Some(channel_id))
        {
            total_member_count += 1;

            if state.user_id == self.bot_user_id {
                bot_present = true;
            } else if !is_bot(guild, state) {
                non_bot_member_count += 1;
            }
        }

        Some(ChannelOccupancy {
            guild_id: guild.id,
            channel_id,
            total_member_count,
            non_bot_member_count,
            bot_present,
        })
    }
}

/// Whether the user behind a voice state is a bot account.
///
/// Prefers the guild member list and falls back to the member attached to the voice
/// state. Unknown users count as humans.
fn is_bot(guild: &Guild, state: &VoiceState) -> bool {
    guild
        .members
        .get(&state.user_id)
        .map(|member| member.user.bot)
        .or_else(|| state.member.as_ref().map(|member| member.user.bot))
        .unwrap_or(false)
}

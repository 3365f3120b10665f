use serenity::all::{ChannelId, GuildId};

/// Snapshot of who is in a voice channel at the instant of an event.
///
/// Derived from the live member list every time it is needed and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOccupancy {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    /// Everyone connected to the channel, bots included.
    pub total_member_count: usize,
    pub non_bot_member_count: usize,
    /// Whether this bot's own user is connected to the channel.
    pub bot_present: bool,
}

impl ChannelOccupancy {
    /// The bot is the only one left in the channel.
    pub fn bot_is_alone(&self) -> bool {
        self.bot_present && self.total_member_count == 1
    }

    /// The crowd has reached the join threshold and the bot is not there yet.
    pub fn qualifies(&self, threshold: usize) -> bool {
        !self.bot_present && self.non_bot_member_count == threshold
    }
}

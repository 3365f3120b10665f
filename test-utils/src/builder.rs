use serde_json::Value;
use serenity::all::{ChannelType, Guild};

use crate::serenity::{
    channel::channel_json, guild::guild_json, member::member_json,
    voice_state::voice_state_json,
};

/// Builder for guilds with voice channels and connected members.
///
/// Provides a fluent interface for laying out who sits in which channel. Call
/// `build()` to deserialize the result into a Serenity `Guild`, shaped like the one the
/// cache holds after `GUILD_CREATE` and subsequent voice state updates.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::GuildBuilder;
///
/// let guild = GuildBuilder::new(1)
///     .with_voice_channel(10, "General")
///     .with_connected_member(100, "alice", false, 10)
///     .with_connected_member(200, "musicbot", true, 10)
///     .build();
/// ```
pub struct GuildBuilder {
    guild_id: u64,
    name: String,
    channels: Vec<Value>,
    members: Vec<Value>,
    voice_states: Vec<Value>,
}

impl GuildBuilder {
    /// Creates a builder for an empty guild named "Test Guild".
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            name: "Test Guild".to_string(),
            channels: Vec::new(),
            members: Vec::new(),
            voice_states: Vec::new(),
        }
    }

    pub fn with_voice_channel(self, channel_id: u64, name: &str) -> Self {
        self.with_channel(channel_id, name, ChannelType::Voice)
    }

    pub fn with_text_channel(self, channel_id: u64, name: &str) -> Self {
        self.with_channel(channel_id, name, ChannelType::Text)
    }

    /// Adds a channel of any type.
    pub fn with_channel(mut self, channel_id: u64, name: &str, kind: ChannelType) -> Self {
        self.channels
            .push(channel_json(self.guild_id, channel_id, name, kind));
        self
    }

    /// Adds a guild member who is not connected to voice.
    pub fn with_member(mut self, user_id: u64, name: &str, bot: bool) -> Self {
        self.members
            .push(member_json(self.guild_id, user_id, name, bot));
        self
    }

    /// Adds a guild member connected to `channel_id`.
    ///
    /// The member is listed both in the guild member list and on the voice state.
    pub fn with_connected_member(
        mut self,
        user_id: u64,
        name: &str,
        bot: bool,
        channel_id: u64,
    ) -> Self {
        let member = member_json(self.guild_id, user_id, name, bot);
        self.voice_states.push(voice_state_json(
            self.guild_id,
            user_id,
            Some(channel_id),
            Some(member.clone()),
        ));
        self.members.push(member);
        self
    }

    /// Adds a voice state for a user the guild member list does not know.
    pub fn with_voice_state(mut self, user_id: u64, channel_id: u64) -> Self {
        self.voice_states.push(voice_state_json(
            self.guild_id,
            user_id,
            Some(channel_id),
            None,
        ));
        self
    }

    /// Builds the guild.
    ///
    /// # Panics
    /// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
    pub fn build(self) -> Guild {
        serde_json::from_value(guild_json(
            self.guild_id,
            &self.name,
            self.channels,
            self.members,
            self.voice_states,
        ))
        .expect("Failed to build test guild - invalid JSON structure")
    }
}

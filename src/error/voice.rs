use serenity::all::{ChannelId, GuildId};
use thiserror::Error;

/// Failures while opening, holding or releasing a voice connection.
///
/// None of these are retried. The controller logs them and resets the affected
/// channel to idle.
#[derive(Error, Debug)]
pub enum VoiceError {
    /// The voice library refused or failed the join request.
    #[error("Failed to join voice channel {channel_id} in guild {guild_id}: {reason}")]
    JoinFailed {
        guild_id: GuildId,
        channel_id: ChannelId,
        reason: String,
    },

    /// The join did not report ready before the pending trigger expired.
    #[error("Timed out joining voice channel {channel_id} in guild {guild_id}")]
    JoinTimedOut {
        guild_id: GuildId,
        channel_id: ChannelId,
    },

    /// The bot holds, or is opening, a voice connection in another channel of this
    /// guild.
    #[error("Already connected to channel {connected_to} in guild {guild_id}")]
    GuildBusy {
        guild_id: GuildId,
        connected_to: ChannelId,
    },

    /// Releasing the connection failed.
    #[error("Failed to leave voice in guild {guild_id}: {reason}")]
    LeaveFailed { guild_id: GuildId, reason: String },
}

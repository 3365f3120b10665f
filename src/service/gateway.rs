//! Seams between the controller and the external voice and cache collaborators.

use std::path::Path;

use serenity::all::{ChannelId, GuildId};
use serenity::async_trait;

use crate::error::{playback::PlaybackError, voice::VoiceError};
use crate::model::occupancy::ChannelOccupancy;

/// Outbound voice operations.
///
/// Implemented by `SongbirdGateway` in the bot layer. The voice library allows one
/// connection per guild, so connections are addressed by guild id.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Joins `channel_id` and resolves once the voice driver is ready.
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), VoiceError>;

    /// Plays `clip` at `volume` on the guild's connection and resolves when the track
    /// ends or errors.
    async fn play(&self, guild_id: GuildId, clip: &Path, volume: f32)
        -> Result<(), PlaybackError>;

    /// Destroys the guild's connection. Succeeds if there was none.
    async fn leave(&self, guild_id: GuildId) -> Result<(), VoiceError>;
}

/// Live occupancy lookup used by the periodic recheck.
pub trait OccupancyProbe: Send + Sync {
    fn occupancy(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelOccupancy>;
}

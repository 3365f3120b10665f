use std::path::PathBuf;

use serenity::all::GuildId;
use thiserror::Error;

/// Failures while playing the notification clip.
///
/// Playback errors never end a voice session; the clip is skipped and the bot stays in
/// the channel.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The audio asset is not on disk.
    #[error("Audio asset not found at {}", .0.display())]
    MissingAsset(PathBuf),

    /// There is no voice connection to play on.
    #[error("No voice connection for guild {0}")]
    NoConnection(GuildId),

    /// The track could not be configured or failed while playing.
    #[error("Track error: {0}")]
    Track(String),

    /// Neither an end nor an error event arrived in time.
    #[error("Playback did not finish within {0:?}")]
    TimedOut(std::time::Duration),
}

//! Error types for the bot.
//!
//! `AppError` is the top-level error for anything that reaches a caller: configuration
//! errors are fatal at startup, voice errors surface from summons, and serenity errors
//! surface from login and the gateway loop. `PlaybackError` stays on its own; the
//! controller logs it where playback happens and never propagates it.

pub mod config;
pub mod playback;
pub mod voice;

use thiserror::Error;

use crate::error::{config::ConfigError, voice::VoiceError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic conversion so `?` works across module boundaries.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    ///
    /// Always fatal: the process exits with a nonzero status before logging in.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Voice connection error (join, timeout, busy guild, leave).
    #[error(transparent)]
    VoiceErr(#[from] VoiceError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

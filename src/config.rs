use std::path::PathBuf;
use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

/// Number of non-bot members in a voice channel that makes the bot join.
pub const OCCUPANCY_THRESHOLD: usize = 4;

/// Window during which repeated qualifying events for one channel are ignored.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(10);

/// Interval of the "bot left alone" recheck while connected.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Volume of the notification clip, 1.0 being full scale.
pub const PLAYBACK_VOLUME: f32 = 0.5;

/// Upper bound on how long the clip may take before playback is abandoned.
pub const PLAYBACK_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_NOTIFICATION_SOUND: &str = "notification.mp3";

pub struct Config {
    pub discord_token: String,

    pub notification_sound_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes the process environment; tests pass a closure over a map so
    /// they never mutate global state.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required values were present
    /// - `Err(AppError::ConfigErr(MissingEnvVar))` - `DISCORD_TOKEN` is unset or blank
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?;

        let notification_sound_path = lookup("NOTIFICATION_SOUND_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTIFICATION_SOUND));

        Ok(Self {
            discord_token,
            notification_sound_path,
        })
    }

    /// Controller settings for this configuration.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            notification_sound_path: self.notification_sound_path.clone(),
            ..ControllerSettings::default()
        }
    }
}

/// Fixed policy values consumed by the join/leave controller.
///
/// Production always uses the constants above. Tests build their own instance to point
/// the clip at a fake path.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub threshold: usize,
    pub debounce_window: Duration,
    pub poll_interval: Duration,
    pub playback_volume: f32,
    pub notification_sound_path: PathBuf,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            threshold: OCCUPANCY_THRESHOLD,
            debounce_window: DEBOUNCE_WINDOW,
            poll_interval: POLL_INTERVAL,
            playback_volume: PLAYBACK_VOLUME,
            notification_sound_path: PathBuf::from(DEFAULT_NOTIFICATION_SOUND),
        }
    }
}

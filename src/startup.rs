use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info` when it is unset or invalid.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Routes panics through `tracing` so they land in the same log as everything else.
///
/// A panic inside an event handler or the occupancy poll only ends that task; the bot
/// keeps running.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Panic: {}", info);
    }));
}

/// Logs whether the notification clip is on disk.
///
/// A missing clip is not fatal: the bot still joins and every playback is skipped.
pub fn log_audio_asset(path: &Path) {
    if path.is_file() {
        tracing::info!("Notification sound found at {}", path.display());
    } else {
        tracing::warn!(
            "Notification sound not found at {}, the bot will join silently",
            path.display()
        );
    }
}

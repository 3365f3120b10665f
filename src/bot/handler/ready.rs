//! Ready event handler.
//!
//! Fired once the bot has authenticated and completed the gateway handshake. Only
//! logs who the bot is and how many guilds it serves; voice tracking starts with the
//! first voice state update.

use serenity::all::{Context, Ready};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `_ctx` - Discord context (unused)
/// - `ready` - Ready event data containing bot user information and guild list
pub async fn handle_ready(_ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.tag());
    tracing::info!("Connected to {} guild(s)", ready.guilds.len());
}

use std::sync::Arc;

use serenity::all::{Context, EventHandler, Message, Ready, VoiceState};
use serenity::async_trait;

use crate::service::controller::JoinLeaveController;

pub mod message;
pub mod ready;
pub mod voice_state;

/// Discord bot event handler
pub struct Handler {
    pub controller: Arc<JoinLeaveController>,
}

impl Handler {
    pub fn new(controller: Arc<JoinLeaveController>) -> Self {
        Self { controller }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called when a user joins, leaves or moves between voice channels
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice_state::handle_voice_state_update(&self.controller, ctx, old, new).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.controller, ctx, message).await;
    }
}

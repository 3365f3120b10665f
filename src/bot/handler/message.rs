use std::sync::Arc;

use serenity::all::{Context, Message};

use crate::bot::command::{
    Command, GUILD_BUSY_REPLY, JOIN_FAILED_REPLY, NOT_IN_VOICE_REPLY, PONG_REPLY,
    TEST_AUDIO_REPLY,
};
use crate::error::{voice::VoiceError, AppError};
use crate::service::controller::{JoinLeaveController, Summon};

/// Handle message creation in a channel
pub async fn handle_message(
    controller: &Arc<JoinLeaveController>,
    ctx: Context,
    message: Message,
) {
    if message.author.bot {
        return;
    }

    let Some(command) = Command::parse(&message.content) else {
        return;
    };

    match command {
        Command::Ping => reply(&ctx, &message, PONG_REPLY).await,
        Command::TestAudio => handle_test_audio(controller, &ctx, &message).await,
    }
}

/// Joins the caller's voice channel and plays the notification there.
async fn handle_test_audio(
    controller: &Arc<JoinLeaveController>,
    ctx: &Context,
    message: &Message,
) {
    let Some(guild_id) = message.guild_id else {
        reply(ctx, message, NOT_IN_VOICE_REPLY).await;
        return;
    };

    let channel_id = ctx.cache.guild(guild_id).and_then(|guild| {
        guild
            .voice_states
            .get(&message.author.id)
            .and_then(|state| state.channel_id)
    });

    let Some(channel_id) = channel_id else {
        reply(ctx, message, NOT_IN_VOICE_REPLY).await;
        return;
    };

    tracing::info!(
        "{} requested an audio test in channel {} of guild {}",
        message.author.name,
        channel_id,
        guild_id
    );

    match controller.summon(guild_id, channel_id).await {
        Ok(Summon::Joined | Summon::AlreadyConnected) => {
            reply(ctx, message, TEST_AUDIO_REPLY).await;
            controller.announce(guild_id, channel_id).await;
        }
        Ok(Summon::JoinInProgress) => reply(ctx, message, TEST_AUDIO_REPLY).await,
        Ok(Summon::ChannelEmptied) => {
            tracing::debug!("Channel {} emptied during audio test join", channel_id);
        }
        Err(AppError::VoiceErr(VoiceError::GuildBusy { connected_to, .. })) => {
            tracing::debug!(
                "Audio test refused in guild {}, connected to {}",
                guild_id,
                connected_to
            );
            reply(ctx, message, GUILD_BUSY_REPLY).await;
        }
        Err(e) => {
            tracing::error!("Audio test join failed: {}", e);
            reply(ctx, message, JOIN_FAILED_REPLY).await;
        }
    }
}

async fn reply(ctx: &Context, message: &Message, content: &str) {
    if let Err(e) = message.reply(&ctx.http, content).await {
        tracing::error!("Failed to reply in channel {}: {}", message.channel_id, e);
    }
}

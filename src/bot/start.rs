use std::sync::Arc;

use serenity::all::{Client, GatewayIntents};
use songbird::{SerenityInit, Songbird};
use tokio::sync::mpsc;

use crate::bot::cache::CacheProbe;
use crate::bot::handler::Handler;
use crate::bot::voice::SongbirdGateway;
use crate::config::Config;
use crate::error::AppError;
use crate::service::controller::JoinLeaveController;
use crate::service::registry::SessionRegistry;

/// Builds the Discord client with voice support and the join/leave controller.
///
/// Creates the songbird manager, the controller with a fresh session registry, and a
/// task draining driver disconnects into the controller. The serenity cache is
/// attached to the occupancy probe once the client exists.
///
/// # Arguments
/// - `config` - Application configuration containing the bot token and clip path
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started with `start_bot`
/// - `Err(AppError::DiscordErr)` - Client construction failed
pub async fn init_bot(config: &Config) -> Result<Client, AppError> {
    // MESSAGE_CONTENT is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let manager = Songbird::serenity();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let gateway = Arc::new(SongbirdGateway::new(manager.clone(), events_tx));
    let probe = Arc::new(CacheProbe::new());
    let controller = JoinLeaveController::new(
        config.controller_settings(),
        SessionRegistry::new(),
        gateway,
        probe.clone(),
    );

    let events_controller = controller.clone();
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            events_controller.handle_connection_event(event).await;
        }
    });

    let client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new(controller))
        .register_songbird_with(manager)
        .await?;

    probe.attach(client.cache.clone());

    Ok(client)
}

/// Runs the gateway connection until it shuts down or fails.
///
/// # Returns
/// - `Ok(())` - The client shut down cleanly
/// - `Err(AppError::DiscordErr)` - Login or the gateway connection failed
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}

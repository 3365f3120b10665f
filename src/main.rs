mod bot;
mod config;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;

use std::process::ExitCode;

use crate::config::Config;
use crate::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    startup::init_tracing();
    startup::install_panic_hook();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    startup::log_audio_asset(&config.notification_sound_path);

    if let Err(e) = run(&config).await {
        tracing::error!("Discord bot error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(config: &Config) -> Result<(), AppError> {
    let client = bot::start::init_bot(config).await?;

    bot::start::start_bot(client).await
}

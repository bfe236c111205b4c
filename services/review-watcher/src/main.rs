//! Review watcher CLI
//!
//! Reads credentials from the environment and polls until interrupted.

use std::path::Path;

use clap::Parser;
use review_watcher::config::{load_env_file, DOTENV_FILE};
use review_watcher::{Config, WatcherError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "review-watcher")]
#[command(about = "Homework review status watcher with Telegram notifications")]
#[command(version)]
#[command(
    after_help = "Environment: PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID (required), \
                  REVIEW_WATCHER_CONFIG (optional JSON settings file), RUST_LOG. \
                  Variables may also come from a .env file in the working directory."
)]
struct Args {}

fn stop(e: WatcherError) -> ! {
    tracing::error!("critical: {}. Stopping.", e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    match load_env_file(Path::new(DOTENV_FILE)) {
        Ok(true) => tracing::debug!("Loaded variables from {}", DOTENV_FILE),
        Ok(false) => {}
        Err(e) => stop(e),
    }

    let config = Config::from_env().unwrap_or_else(|e| stop(e));

    tracing::debug!("All credentials present");
    tracing::debug!(
        "Endpoint: {}, retry period: {}s, request timeout: {}s",
        config.status_api.endpoint,
        config.polling.retry_period_seconds,
        config.status_api.request_timeout_seconds
    );

    if let Err(e) = review_watcher::run(config).await {
        if !e.is_recoverable() {
            stop(e);
        }
        return Err(e.into());
    }

    Ok(())
}

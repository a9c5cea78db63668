//! Autoreact Fleet - Main Entry Point
//!
//! Starts one polling worker per bot token and reacts to every group
//! message with a random emoji until stopped.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use autoreact_fleet::config::FleetConfig;
use autoreact_fleet::fleet::FleetSupervisor;
use autoreact_fleet::telegram::{HttpBotApi, RemoteClient};

/// Fleet of Telegram bots that react to messages with random emoji.
#[derive(Parser, Debug)]
#[command(name = "autoreact")]
#[command(about = "React to Telegram group messages with random emoji from many bots")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let config = FleetConfig::from_env().context("Failed to load fleet configuration")?;
    info!("Loaded {} bot tokens", config.credentials.len());

    let api = HttpBotApi::new(&config.api).context("Failed to create Bot API client")?;
    let client = RemoteClient::new(Arc::new(api), config.api.fetch_retry);

    let mut fleet = FleetSupervisor::start(&config, &client);

    info!("Fleet is running. Use Ctrl+C to stop.");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        exits = fleet.wait() => {
            info!("All {} workers have exited", exits.len());
        }
    }

    fleet.shutdown().await;

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

//! Standalone checker for bot tokens.
//!
//! Loads the same environment as the fleet, resolves every configured token
//! with `getMe` and reports which accounts would start.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use autoreact_fleet::config::FleetConfig;
use autoreact_fleet::telegram::{HttpBotApi, RemoteClient, RetryPolicy};

/// Bot token checker.
#[derive(Parser, Debug)]
#[command(name = "check_tokens")]
#[command(about = "Checks that every configured bot token resolves to a bot account")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Show the links used in the welcome message.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        eprintln!("Note: could not load {} ({e})", args.env_file);
    }

    let config = match FleetConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let api = match HttpBotApi::new(&config.api) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("✗ Failed to create Bot API client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let client = RemoteClient::new(Arc::new(api), RetryPolicy::no_retry());

    println!("Checking {} bot tokens against {}\n", config.credentials.len(), config.api.base_url);

    if args.verbose {
        println!("Updates button: {}", config.links.channel_url);
        println!("Support button: {}\n", config.links.group_url);
    }

    let mut failures = 0;
    for credential in &config.credentials {
        match client.identify(credential).await {
            Ok(identity) => println!("  ✓ {credential} → {identity}"),
            Err(e) => {
                failures += 1;
                println!("  ✗ {credential}: {e}");
            }
        }
    }

    println!();

    let total = config.credentials.len();
    if failures == 0 {
        println!("✓ All {total} tokens are valid!");
        ExitCode::SUCCESS
    } else {
        println!("✗ {failures} of {total} tokens failed; those bots will not start");
        ExitCode::FAILURE
    }
}

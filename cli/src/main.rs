//! CLI for the PUBG stats client.
//!
//! Looks up one or more players by name and prints the API's resource
//! objects as JSON.

use clap::Parser;
use pubg_stats_client::{Client, ClientConfig, ClientError};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Look up PUBG players by name and print their API records.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player names to look up.
    #[arg(required = true)]
    names: Vec<String>,

    /// PUBG API key.
    #[arg(long, env = "PUBG_API_KEY")]
    api_key: String,

    /// Platform shard (steam, xbox, psn, stadia).
    #[arg(long, default_value = "steam")]
    platform: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the lookup
    match run(&args).await {
        Ok(()) => ExitCode::from(0),
        Err(error) => {
            error!(error = %error, "Player lookup failed");
            match error {
                ClientError::Validation { .. } => ExitCode::from(2),
                _ => ExitCode::from(1),
            }
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Builds the client, performs the lookup, and prints the result.
async fn run(args: &Args) -> Result<(), ClientError> {
    let config =
        ClientConfig::new(args.api_key.clone()).with_platform(args.platform.clone());
    let client = Client::new(config)?;

    let envelope = client.get_player_info(&args.names).await?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&envelope.data)
    } else {
        serde_json::to_string(&envelope.data)
    }
    .map_err(|source| ClientError::Parse { source })?;
    println!("{rendered}");

    Ok(())
}

// src/main.rs

mod collect;
mod config;
mod distance;
mod gate;
mod status;
mod store;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use collect::CollectArgs;
use status::StatusArgs;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Runs `collect` with default settings when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Query travel times for the active region if its interval has elapsed
    Collect(CollectArgs),
    /// Show the active region and whether it is due, without querying
    Status(StatusArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Collect(CollectArgs::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, if present
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    match cli.command.unwrap_or_default() {
        Commands::Collect(args) => {
            collect::run(args).await.context("Traffic collection failed")?;
        }
        Commands::Status(args) => {
            status::run(args).await.context("Status check failed")?;
        }
    }

    Ok(())
}

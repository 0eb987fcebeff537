//! Contributors server binary entry point.
//!
//! Serves the contributor association API over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use post_contributors::{ContributorsConfig, ContributorsServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Contributors server CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "contributors-server")]
#[command(about = "Attach contributors to content items and render them")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP API listen address (overrides the config file).
    #[arg(short = 'l', long)]
    listen: Option<SocketAddr>,

    /// Data directory for persistence (overrides the config file).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Keep metadata in memory only.
    #[arg(long)]
    in_memory: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {:?}", path);
            ContributorsConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {path:?}"))?
        }
        None => ContributorsConfig::default(),
    };

    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if args.in_memory {
        config.storage.in_memory = true;
    }

    tracing::info!("Starting contributors server");
    tracing::info!("Eligible capability: {}", config.association.eligible_capability);
    tracing::info!("HTTP listen address: {}", config.server.listen);

    let server = ContributorsServer::new(config).context("Failed to create contributors server")?;

    server.run().await?;

    Ok(())
}

//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use mmdb_core::{MmdbConfig, Records, Stores};
use mmdb_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config and PORT/MMDB_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(mut config: MmdbConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(timeout) = args.timeout {
        config.server.request_timeout_secs = timeout;
    }
    config.server.cors_permissive |= args.cors_permissive;

    tracing::info!("Starting mmdb server on {}", config.server.bind);

    let stores = Stores::connect(&config)
        .await
        .context("Failed to connect record stores")?;

    // Run server (blocks until shutdown)
    let result = run_server(Records::new(&stores), ServerConfig::from(&config.server)).await;
    stores.close().await;
    result.context("Server error")?;

    Ok(())
}

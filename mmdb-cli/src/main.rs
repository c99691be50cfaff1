//! mmdb CLI - multi-backend record service
//!
//! Serves users, alerts and transactions over HTTP/JSON, each record kind
//! persisted in its own configured backend (memory, Postgres, MySQL, Redis
//! or an embedded file).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "mmdb",
    author,
    version,
    about = "Record service for users, alerts and transactions over pluggable storage backends"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.mmdb/config.toml)
    #[arg(long, short = 'c', global = true, env = "MMDB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to every configured backend and report its health
    Check,
    /// Print the resolved configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(config, args).await?,
        Commands::Check => commands::run_check(config).await?,
        Commands::Config => commands::run_config(&config)?,
    }
    Ok(())
}

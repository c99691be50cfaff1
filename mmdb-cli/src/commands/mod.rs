//! Command implementations for the mmdb CLI

pub mod check;
pub mod config;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use mmdb_core::MmdbConfig;

pub use check::run_check;
pub use config::run_config;
pub use serve::run_serve;

/// Resolve configuration from file and environment.
pub fn load_config(path: Option<&Path>) -> Result<MmdbConfig> {
    let config = MmdbConfig::load(path).context("Failed to load configuration")?;
    tracing::debug!(
        users = %config.stores.users,
        alerts = %config.stores.alerts,
        transactions = %config.stores.transactions,
        "configuration resolved"
    );
    Ok(config)
}

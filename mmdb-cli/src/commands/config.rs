//! Print the resolved configuration

use anyhow::{Context, Result};
use mmdb_core::MmdbConfig;

pub fn run_config(config: &MmdbConfig) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}

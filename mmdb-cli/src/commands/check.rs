//! Backend connectivity check

use anyhow::{bail, Context, Result};
use mmdb_core::{MmdbConfig, Stores};

/// Connect every configured backend, ping it and print one line per record kind.
pub async fn run_check(config: MmdbConfig) -> Result<()> {
    let stores = Stores::connect(&config)
        .await
        .context("Failed to connect record stores")?;

    let mut failures = 0;
    for (kind, backend, result) in stores.ping_all().await {
        match result {
            Ok(()) => println!("{kind:<13} {backend:<9} ok"),
            Err(e) => {
                failures += 1;
                println!("{kind:<13} {backend:<9} FAILED: {e}");
            }
        }
    }
    stores.close().await;

    if failures > 0 {
        bail!("{} record store(s) unhealthy", failures);
    }
    Ok(())
}

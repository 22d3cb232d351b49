//! Songsmith CLI library.
//!
//! Command implementations for the `songsmith` binary, plus diagnostic setup.
//! Each command is a thin pipeline entry point over the backend crates.

pub mod commands;

use anyhow::{anyhow, Result};

/// Installs the `tracing` subscriber used for diagnostics.
///
/// Filtering follows `RUST_LOG`; with it unset only errors are shown, so the
/// colored status lines stay readable.
pub fn setup_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err: Box<dyn std::error::Error + Send + Sync>| {
            anyhow!("failed to initialise tracing: {err}")
        })?;
    Ok(())
}

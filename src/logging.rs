//! `tracing` subscriber setup for the CLI.
//!
//! `RUST_LOG` wins when set; otherwise `-v` flags raise the default `warn`
//! level for this crate. Output goes to stderr so stdout only ever carries
//! the resulting locator.

use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init(verbose: u8) -> Result<()> {
    let level = level_for(verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,ghup={}", level)));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

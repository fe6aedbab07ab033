//! autotagger - fills in audio file tags from the iTunes catalog.
//!
//! Looks each file up by its existing tags or its file name, then writes
//! title, artist, album, artwork, lyrics and the rest into the file's native
//! tag format, optionally converting, renaming and relocating it.

pub mod cli;
pub mod config;
pub mod converter;
pub mod enrichment;
pub mod error;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod processor;
pub mod query;
pub mod scanner;
pub mod temp;
#[cfg(test)]
pub mod test_utils;

use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let config = args.load_config()?;

    init_logging(&config.logging)?;
    tracing::debug!(?config, "Configuration loaded");

    cli::run_command(&args, &config)
}

/// Console logging, plus an optional plain-text log file.
///
/// `RUST_LOG` takes precedence over the verbosity setting.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let default_directive = if logging.verbose {
        "autotagger=info"
    } else {
        "autotagger=error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .with(filter)
        .init();
    Ok(())
}

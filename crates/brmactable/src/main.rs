//! Bridge MAC Table Reporter
//!
//! Entry point for the brmactable tool.

use anyhow::Context;
use clap::Parser;
use sonic_brmactable::{exit_status, open_acquirer, report, Config, Result, EXIT_USAGE};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging() {
        eprintln!("brmactable: {e:#}");
    }

    let outcome = run(&config);
    match &outcome {
        Ok(count) => debug!(bridge = %config.bridge, entries = count, "done"),
        Err(e) if e.is_usage() => error!(error = %e, "brmactable: invalid arguments"),
        Err(e) => error!(bridge = %config.bridge, error = %e, "brmactable: acquisition aborted"),
    }

    ExitCode::from(exit_status(&outcome))
}

/// Initializes tracing; diagnostics go to stderr, stdout carries only data
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn run(config: &Config) -> Result<usize> {
    let mut acquirer = open_acquirer(config)?;
    report(acquirer.as_mut(), &config.output_format(), io::stdout().lock())
}

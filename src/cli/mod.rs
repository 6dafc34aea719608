//! CLI module: Clap argument parser, logging setup, output helpers,
//! and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{ProviderConfig, Settings};
use crate::errors::Result;

/// credcycle CLI: inspect rotating database secrets and smoke-test them.
#[derive(Parser)]
#[command(
    name = "credcycle",
    about = "Rotation-aware database credentials",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./credcycle.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Name of the secret at the provider (overrides config)
    #[arg(short, long, global = true, env = "CREDCYCLE_SECRET_NAME")]
    pub secret: Option<String>,

    /// Database name for the connection string (overrides config)
    #[arg(long, global = true)]
    pub db_name: Option<String>,

    /// Read the raw secret from this file instead of the configured provider
    #[arg(long, global = true)]
    pub secret_file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Fetch and decode the secret, showing that caching works
    Inspect,

    /// Check that the decoded database address accepts connections
    Probe {
        /// Connect timeout in seconds
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// Show version
    Version,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `-v`.
/// Logs go to stderr so command output stays clean.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. in tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve settings from the config file plus command-line overrides.
pub fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(Path::new(path))?,
        None => Settings::load(&std::env::current_dir()?)?,
    };

    if let Some(ref name) = cli.secret {
        settings.secret_name = name.clone();
    }
    if let Some(ref db) = cli.db_name {
        settings.database = db.clone();
    }
    if let Some(ref file) = cli.secret_file {
        settings.provider = ProviderConfig::File {
            path: PathBuf::from(file),
        };
    }

    Ok(settings)
}

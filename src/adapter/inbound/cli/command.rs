//! Command-line interface definitions.
//!
//! The default invocation polls forever; the other subcommands inspect
//! configuration without touching any remote site.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Vaccine appointment availability watcher
#[derive(Parser, Debug)]
#[command(name = "slotwatch")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the configured scrapers and post new availability (default)
    Run(RunArgs),

    /// Record current counts once, without notifying, then exit
    Seed(RunArgs),

    /// List the scrapers this build knows about
    Scrapers,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `slotwatch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file and exit.
    Validate(ConfigPathArg),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
}

/// Path to a configuration file.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Arguments for `slotwatch run` and `slotwatch seed`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Comma-separated scrapers to run instead of the configured set
    #[arg(long, value_delimiter = ',')]
    pub scrapers: Option<Vec<String>>,

    /// Record baselines on the first pass instead of notifying
    #[arg(long, env = "SEED_STORE")]
    pub seed: bool,

    /// Seconds between iteration starts
    #[arg(long, env = "UPDATE_FREQUENCY")]
    pub interval: Option<u64>,

    /// Stop at the first scraper failure instead of skipping the scraper
    #[arg(long)]
    pub fail_fast: bool,
}

impl RunArgs {
    /// Trimmed, non-empty scraper names from `--scrapers`.
    #[must_use]
    pub fn scraper_names(&self) -> Option<Vec<String>> {
        self.scrapers.as_ref().map(|raw| {
            raw.iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
    }
}

//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use stampede_config::BodyEncoding;
use stampede_core::ScenarioKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a load test
    Run(RunArgs),

    /// List the built-in scenarios
    Scenarios,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Flags for `stampede run`; every flag overrides the configuration file
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scenario to run: album, product, product-search
    #[arg(long, short = 's', value_name = "SCENARIO")]
    pub scenario: ScenarioKind,

    /// Base URL of the service under test
    #[arg(long, short = 'H', value_name = "URL")]
    pub host: Option<String>,

    /// Number of concurrent users
    #[arg(long, short = 'u', value_name = "N")]
    pub users: Option<u32>,

    /// Users started per second
    #[arg(long, short = 'r', value_name = "RATE")]
    pub spawn_rate: Option<f64>,

    /// Stop after this many seconds
    #[arg(long, short = 't', value_name = "SECS")]
    pub run_time: Option<f64>,

    /// Tasks per user before it stops
    #[arg(long, value_name = "N")]
    pub iterations: Option<u64>,

    /// Seed for a reproducible request mix
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Product ids seeded and requested by the product scenario
    #[arg(long, value_name = "N")]
    pub product_count: Option<u32>,

    /// Body encoding for product detail posts: json, raw
    #[arg(long, value_name = "ENCODING")]
    pub body_encoding: Option<BodyEncoding>,

    /// Write the run report as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the stats table as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Don't print the stats table
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Path to configuration file (optional, uses default loading logic)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - aeromodel check --config <path>
//! - aeromodel create --config <path> --schema <name>
//! - aeromodel update --config <path> --schema <name>
//! - aeromodel batch --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aeromodel - A strict, deterministic schema definition and instantiation engine
#[derive(Parser, Debug)]
#[command(name = "aeromodel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity (trace, info, warn, error, fatal); overrides the config
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and compile every schema, then describe them
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./aeromodel.json")]
        config: PathBuf,
    },

    /// Build one instance from a JSON object on stdin
    Create {
        /// Path to configuration file
        #[arg(long, default_value = "./aeromodel.json")]
        config: PathBuf,

        /// Schema name
        #[arg(long)]
        schema: String,
    },

    /// Apply {"existing", "changes"} from stdin to an instance
    Update {
        /// Path to configuration file
        #[arg(long, default_value = "./aeromodel.json")]
        config: PathBuf,

        /// Schema name
        #[arg(long)]
        schema: String,
    },

    /// Process one request per stdin line
    Batch {
        /// Path to configuration file
        #[arg(long, default_value = "./aeromodel.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

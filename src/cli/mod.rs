//! CLI module for aeromodel
//!
//! Provides command-line interface for:
//! - check: Load and compile every schema
//! - create: One-shot instance build
//! - update: One-shot instance update
//! - batch: Line-delimited request loop

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{batch, check, create, describe, handle_request, run, run_command, update, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{build_response, error_response, read_request, read_requests, write_json, write_response};

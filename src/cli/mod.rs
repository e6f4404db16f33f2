//! CLI module for auradb
//!
//! Provides command-line access for:
//! - init: create the data directory and namespaces
//! - log: upsert a daily feature snapshot
//! - predict: one-shot scored prediction
//! - show: dump a namespace
//! - count: count a namespace

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{count, init, log, predict, run, run_command, show};
pub use errors::{CliError, CliResult};

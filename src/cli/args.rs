//! CLI argument definitions using clap
//!
//! Commands:
//! - auradb init --data <dir>
//! - auradb log --data <dir> --day <key> [--json <snapshot>]
//! - auradb predict --data <dir> [--json <snapshot>] [--tree <path>]
//! - auradb show --data <dir> --namespace <ns>
//! - auradb count --data <dir> --namespace <ns>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// auradb - local record store with deterministic migraine-risk inference
#[derive(Parser, Debug)]
#[command(name = "auradb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a data directory and create every namespace
    Init {
        /// Path to the data directory
        #[arg(long, default_value = "./auradb")]
        data: PathBuf,
    },

    /// Upsert one daily feature snapshot
    Log {
        /// Path to the data directory
        #[arg(long, default_value = "./auradb")]
        data: PathBuf,

        /// Day key for the snapshot, e.g. 2024-05-01
        #[arg(long)]
        day: String,

        /// Snapshot JSON; read from stdin when omitted
        #[arg(long)]
        json: Option<String>,
    },

    /// Score a snapshot against the tree and the stored history
    Predict {
        /// Path to the data directory
        #[arg(long, default_value = "./auradb")]
        data: PathBuf,

        /// Snapshot JSON; read from stdin when omitted
        #[arg(long)]
        json: Option<String>,

        /// Tree asset file overriding the bundled tree
        #[arg(long)]
        tree: Option<PathBuf>,
    },

    /// Dump a namespace as JSON lines
    Show {
        /// Path to the data directory
        #[arg(long, default_value = "./auradb")]
        data: PathBuf,

        /// Namespace to dump
        #[arg(long)]
        namespace: String,
    },

    /// Count the records in a namespace
    Count {
        /// Path to the data directory
        #[arg(long, default_value = "./auradb")]
        data: PathBuf,

        /// Namespace to count
        #[arg(long)]
        namespace: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

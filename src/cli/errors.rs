//! # CLI Errors
//!
//! Error types for the command-line interface.

use thiserror::Error;

use crate::engine::EngineError;
use crate::pipeline::PredictError;
use crate::records::RecordError;
use crate::registry::RegistryError;
use crate::tree::TreeError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Command-line interface errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid invocation (bad namespace name, malformed input)
    #[error("{0}")]
    Usage(String),

    /// Snapshot or record JSON failed to parse
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Records(#[from] RecordError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    /// Filesystem or stdin failure
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

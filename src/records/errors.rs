//! # Record Errors
//!
//! Error types for record CRUD operations.

use thiserror::Error;

use crate::engine::{EngineError, RecordKey};
use crate::registry::RegistryError;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record engine errors
#[derive(Debug, Error)]
pub enum RecordError {
    /// `create` on an id that already exists
    #[error("record '{0}' already exists")]
    DuplicateKey(RecordKey),

    /// `update` on an id that does not exist
    #[error("record '{0}' not found")]
    NotFound(RecordKey),

    /// Partial update payload was not a JSON object
    #[error("partial update must be a JSON object")]
    InvalidPartial,

    /// Payload (de)serialization failed
    #[error("payload serialization failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// Namespace registration failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Engine transaction failed
    #[error(transparent)]
    Engine(#[from] EngineError),
}

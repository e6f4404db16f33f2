//! # Registry Errors
//!
//! Error types for namespace registration.

use thiserror::Error;

use crate::engine::EngineError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Namespace registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The upgrade was blocked by another open engine connection
    #[error("engine upgrade blocked by another open connection")]
    EngineBlocked,

    /// Opening or upgrading the engine failed
    #[error("engine open failed: {0}")]
    EngineOpenFailed(String),
}

impl From<EngineError> for RegistryError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Blocked(_) => RegistryError::EngineBlocked,
            other => RegistryError::EngineOpenFailed(other.to_string()),
        }
    }
}

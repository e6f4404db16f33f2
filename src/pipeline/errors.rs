//! # Pipeline Errors
//!
//! Error types for the prediction pipeline.

use thiserror::Error;

use crate::records::RecordError;
use crate::tree::TreeError;

/// Result type for pipeline operations
pub type PredictResult<T> = Result<T, PredictError>;

/// Prediction pipeline errors
#[derive(Debug, Error)]
pub enum PredictError {
    /// Reading or writing records failed
    #[error(transparent)]
    Records(#[from] RecordError),

    /// Tree evaluation failed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

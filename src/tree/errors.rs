//! # Tree Errors
//!
//! Error types for decision tree loading and evaluation.

use thiserror::Error;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Decision tree loading and evaluation errors
#[derive(Debug, Error)]
pub enum TreeError {
    /// The record cannot supply a feature the tree splits on
    #[error("record is missing feature '{0}' required by the tree")]
    MissingFeature(String),

    /// A leaf with a (0, 0) class distribution was reached
    #[error("leaf with empty class distribution")]
    DegenerateLeaf,

    /// The tree asset is not valid JSON for the node shape
    #[error("tree asset parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The tree parsed but violates a structural invariant
    #[error("invalid tree: {0}")]
    Invalid(String),

    /// Reading a tree asset file failed
    #[error("i/o failure reading tree asset: {0}")]
    Io(#[from] std::io::Error),
}

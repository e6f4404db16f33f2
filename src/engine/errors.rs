//! # Engine Errors
//!
//! Error types for the embedded transactional engine.

use thiserror::Error;

use super::key::RecordKey;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the embedded transactional engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Opening the store file failed
    #[error("failed to open store: {0}")]
    OpenFailed(String),

    /// An upgrade requires exclusive access but other connections are open
    #[error("upgrade blocked by {0} open connection(s)")]
    Blocked(usize),

    /// A connection requested a version older than the one on disk
    #[error("requested version {requested} is older than existing version {existing}")]
    VersionTooOld { requested: u32, existing: u32 },

    /// Store creation collided with an existing store
    #[error("store '{0}' already exists")]
    StoreExists(String),

    /// Index creation collided with an existing index
    #[error("index '{index}' already exists on store '{store}'")]
    IndexExists { store: String, index: String },

    /// The named store does not exist at the current version
    #[error("unknown store '{0}'")]
    UnknownStore(String),

    /// The named index does not exist on the store
    #[error("unknown index '{index}' on store '{store}'")]
    UnknownIndex { store: String, index: String },

    /// The store is not part of this transaction's scope
    #[error("store '{0}' is outside this transaction's scope")]
    OutOfScope(String),

    /// A mutation was attempted through a read-only transaction
    #[error("write operation on a read-only transaction")]
    ReadOnlyTransaction,

    /// `add` on a key that is already present
    #[error("key '{0}' already exists")]
    KeyExists(RecordKey),

    /// Operation on a connection that has been closed
    #[error("connection is closed")]
    ConnectionClosed,

    /// Snapshot failed checksum or framing validation (halt, do not open)
    #[error("snapshot corruption: {0}")]
    Corruption(String),

    /// Snapshot (de)serialization failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Underlying file I/O failed
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

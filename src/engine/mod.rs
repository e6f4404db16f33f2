//! Embedded transactional engine for auradb
//!
//! A versioned, file-backed namespace store. Namespaces ("stores") hold
//! JSON rows keyed by integer or string keys, with generated secondary
//! indexes for timestamp-ordered scans.
//!
//! # Design Principles
//!
//! - Explicit handle, no global state (any number of isolated engines)
//! - Schema changes only inside exclusive, version-bumping upgrades
//! - One logical operation = one transaction, scoped to named stores
//! - Write-through durability: every ReadWrite commit persists a
//!   checksummed snapshot via temp file + fsync + rename
//! - Halt-on-corruption: a snapshot that fails checksum never loads

mod engine;
mod errors;
mod key;
mod snapshot;
mod store;
mod transaction;

pub use engine::{Connection, Engine, UpgradeTransaction};
pub use errors::{EngineError, EngineResult};
pub use key::RecordKey;
pub use snapshot::compute_checksum;
pub use store::{EngineState, ObjectStore};
pub use transaction::{Transaction, TransactionMode};

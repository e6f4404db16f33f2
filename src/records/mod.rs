//! Record engine for auradb
//!
//! Typed CRUD over namespaces, one atomic engine transaction per logical
//! operation. The inference pipeline consumes these records read-only;
//! all writes come from the application.

mod engine;
mod errors;
mod record;

pub use engine::RecordEngine;
pub use errors::{RecordError, RecordResult};
pub use record::StoredRecord;

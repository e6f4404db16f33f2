//! Observability for auradb
//!
//! Structured, synchronous JSON logging for the handful of events worth
//! seeing from the outside: engine open/upgrade, namespace creation, and
//! scored predictions. No metrics layer.

mod logger;

pub use logger::{Logger, Severity};

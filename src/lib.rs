//! auradb - a local-first, schema-versioned record store with
//! deterministic migraine-risk inference
//!
//! The crate has two halves. The storage half (`engine`, `registry`,
//! `records`) is an embedded, versioned, transactional namespace store
//! with write-through snapshot durability. The inference half (`tree`,
//! `trends`, `explain`, `pipeline`) scores a daily feature snapshot
//! against an immutable pre-trained decision tree and explains the score.

pub mod cli;
pub mod engine;
pub mod explain;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod records;
pub mod registry;
pub mod trends;
pub mod tree;

//! Trend analysis for auradb
//!
//! Classifies each evaluated feature's recent trajectory against a
//! historical window of daily snapshots.

mod analyzer;

pub use analyzer::{compute_trends, Trend, TrendClass, STABLE_BAND_PCT};

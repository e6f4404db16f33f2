//! Explanation engine for auradb
//!
//! Ranks the features that drove a risk score and renders them into text
//! a person can act on. Everything here is a pure function of the
//! evaluation path and the trend set.

mod drivers;
mod report;
mod templates;

pub use drivers::{rank_drivers, Driver, TOP_DRIVERS};
pub use report::{describe_trend, explain, Explanation, RiskBand};
pub use templates::{describe, is_problematic, recommend, risk_side, RiskSide};

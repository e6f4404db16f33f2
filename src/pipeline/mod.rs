//! Prediction pipeline for auradb
//!
//! The caller-facing surface: log snapshots and attacks, request scored,
//! explained predictions.

mod errors;
mod predictor;

pub use errors::{PredictError, PredictResult};
pub use predictor::{
    DetailedExplanation, Prediction, PredictionMeta, Predictor, HISTORY_WINDOW_DAYS,
};

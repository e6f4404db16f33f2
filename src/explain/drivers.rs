//! Driver ranking
//!
//! Turns an evaluation path and the trend set into the short list of
//! features that most pushed the score toward risk. Scoring is
//! risk-aligned magnitude past the split threshold, weighted by whether
//! the feature's recent trend moves toward or away from risk, then
//! normalized against the strongest driver.

use serde::Serialize;

use crate::trends::{Trend, TrendClass};
use crate::tree::{Direction, FeatureObservation};

use super::templates::{risk_side, RiskSide};

/// Drivers returned by [`rank_drivers`]
pub const TOP_DRIVERS: usize = 3;

/// Weight applied when the feature's trend moves toward risk
const TOWARD_RISK_WEIGHT: f64 = 1.2;
/// Weight applied when the feature's trend moves away from risk
const AWAY_FROM_RISK_WEIGHT: f64 = 0.9;
/// Extra weight for fast-moving trends
const MOMENTUM_WEIGHT: f64 = 1.1;
/// Change percent beyond which a trend counts as fast-moving
const MOMENTUM_BAND_PCT: f64 = 20.0;
/// Normalization floor for an all-zero score set
const SCORE_EPSILON: f64 = 1e-9;

/// A ranked risk driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    /// Feature name
    pub label: String,
    /// Value observed on the current record
    pub current: f64,
    /// Threshold at the deduplicated observation
    pub threshold: f64,
    /// Branch taken at that observation
    pub direction: Direction,
    /// Score relative to the strongest driver, in [0, 1]
    pub normalized_score: f64,
}

/// Risk-aligned magnitude of one observation: how far past the threshold
/// the value sits, on the feature's risky side, relative to the threshold.
fn raw_magnitude(obs: &FeatureObservation) -> f64 {
    let safe_threshold = obs.threshold.abs().max(0.1);
    let distance = match risk_side(&obs.label) {
        RiskSide::Low => obs.threshold - obs.value,
        RiskSide::High => obs.value - obs.threshold,
    };
    (distance / safe_threshold).max(0.0)
}

/// Deduplicates a path by feature label, keeping the observation with the
/// larger raw magnitude. Order follows first appearance on the path.
pub(super) fn dedupe_path(path: &[FeatureObservation]) -> Vec<FeatureObservation> {
    let mut kept: Vec<FeatureObservation> = Vec::new();
    for obs in path {
        match kept.iter_mut().find(|k| k.label == obs.label) {
            Some(existing) => {
                if raw_magnitude(obs) > raw_magnitude(existing) {
                    *existing = obs.clone();
                }
            }
            None => kept.push(obs.clone()),
        }
    }
    kept
}

fn trend_weight(label: &str, trends: &[Trend]) -> f64 {
    let Some(trend) = trends.iter().find(|t| t.feature == label) else {
        return 1.0;
    };

    let toward_risk = matches!(
        (risk_side(label), trend.classification),
        (RiskSide::High, TrendClass::Increasing) | (RiskSide::Low, TrendClass::Decreasing)
    );
    let away_from_risk = matches!(
        (risk_side(label), trend.classification),
        (RiskSide::High, TrendClass::Decreasing) | (RiskSide::Low, TrendClass::Increasing)
    );

    let mut weight = if toward_risk {
        TOWARD_RISK_WEIGHT
    } else if away_from_risk {
        AWAY_FROM_RISK_WEIGHT
    } else {
        1.0
    };
    if trend.change_percent.abs() > MOMENTUM_BAND_PCT {
        weight *= MOMENTUM_WEIGHT;
    }
    weight
}

/// Ranks the top drivers behind a score.
pub fn rank_drivers(path: &[FeatureObservation], trends: &[Trend]) -> Vec<Driver> {
    let deduped = dedupe_path(path);

    let scored: Vec<(FeatureObservation, f64)> = deduped
        .into_iter()
        .map(|obs| {
            let score = raw_magnitude(&obs) * trend_weight(&obs.label, trends);
            (obs, score)
        })
        .collect();

    let max_score = scored
        .iter()
        .map(|(_, s)| *s)
        .fold(0.0_f64, f64::max)
        .max(SCORE_EPSILON);

    let mut drivers: Vec<Driver> = scored
        .into_iter()
        .map(|(obs, score)| Driver {
            label: obs.label,
            current: obs.value,
            threshold: obs.threshold,
            direction: obs.direction,
            normalized_score: score / max_score,
        })
        .collect();

    drivers.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
    drivers.truncate(TOP_DRIVERS);
    drivers
}

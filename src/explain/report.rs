//! Explanation assembly
//!
//! Buckets the score into a risk band and renders the ranked drivers into
//! a one-line summary, key factor descriptions, and recommendations.

use std::fmt;

use serde::Serialize;

use crate::trends::{Trend, TrendClass};
use crate::tree::FeatureObservation;

use super::drivers::{dedupe_path, rank_drivers, Driver};
use super::templates::{describe, recommend};

/// Score bucket boundaries
const MODERATE_FLOOR: f64 = 0.4;
const HIGH_FLOOR: f64 = 0.7;

/// Coarse risk bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Buckets a score: low below 0.4, moderate below 0.7, high at or above
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_FLOOR {
            RiskBand::High
        } else if score >= MODERATE_FLOOR {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "moderate",
            RiskBand::High => "high",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable explanation of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// One-line summary with the band and the main factors
    pub summary: String,
    /// Plain-language description of the top drivers, strongest first
    pub key_factors: Vec<String>,
    /// Recommendation per problematic feature, path order
    pub recommendations: Vec<String>,
}

/// Builds the explanation for a scored evaluation.
pub fn explain(score: f64, path: &[FeatureObservation], trends: &[Trend]) -> Explanation {
    let band = RiskBand::from_score(score);
    let drivers = rank_drivers(path, trends);

    let key_factors: Vec<String> = drivers
        .iter()
        .filter(|d| d.normalized_score > 0.0)
        .map(|d| describe(&driver_observation(d)))
        .collect();

    let mut summary = format!("Migraine risk is {} ({:.0}%).", band, score * 100.0);
    if !key_factors.is_empty() {
        summary.push_str(" Main factors: ");
        summary.push_str(&key_factors.join("; "));
        summary.push('.');
    }

    let recommendations: Vec<String> = dedupe_path(path)
        .iter()
        .filter_map(recommend)
        .collect();

    Explanation {
        summary,
        key_factors,
        recommendations,
    }
}

/// One-line rendering of a trend for the detailed explanation.
pub fn describe_trend(trend: &Trend) -> String {
    match trend.classification {
        TrendClass::Stable => {
            format!("{} is steady around {:.1}", trend.feature, trend.average)
        }
        TrendClass::Increasing => format!(
            "{} is up {:.0}% on its recent average",
            trend.feature, trend.change_percent
        ),
        TrendClass::Decreasing => format!(
            "{} is down {:.0}% on its recent average",
            trend.feature,
            trend.change_percent.abs()
        ),
    }
}

fn driver_observation(driver: &Driver) -> FeatureObservation {
    FeatureObservation {
        label: driver.label.clone(),
        value: driver.current,
        threshold: driver.threshold,
        direction: driver.direction,
    }
}

//! Trend computation
//!
//! For each unique feature on an evaluation path, compares the current
//! value against its arithmetic mean over a caller-supplied historical
//! window. The caller filters and orders the window (the prediction
//! pipeline uses the most recent 7 days); an empty window is valid and
//! classifies everything as stable.

use serde::{Deserialize, Serialize};

use crate::tree::{FeatureObservation, FeatureSource};

/// Change band, in percent, inside which a feature counts as stable
pub const STABLE_BAND_PCT: f64 = 5.0;

/// Direction of a feature's recent trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClass {
    Increasing,
    Decreasing,
    Stable,
}

/// One feature's trajectory relative to its historical average
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    /// Feature name
    pub feature: String,
    /// Value on the current record
    pub current: f64,
    /// Mean over the historical window (equals `current` when the window
    /// has no usable values for this feature)
    pub average: f64,
    /// Classification of the change
    pub classification: TrendClass,
    /// Relative change vs the average, in percent
    pub change_percent: f64,
}

/// Computes one trend per unique feature label on the path, in order of
/// first appearance.
pub fn compute_trends<S: FeatureSource>(
    current: &S,
    history: &[S],
    path: &[FeatureObservation],
) -> Vec<Trend> {
    let mut seen: Vec<&str> = Vec::new();
    let mut trends = Vec::new();

    for obs in path {
        if seen.contains(&obs.label.as_str()) {
            continue;
        }
        seen.push(&obs.label);

        let value = current.feature(&obs.label).unwrap_or(obs.value);
        trends.push(trend_for(&obs.label, value, history));
    }

    trends
}

fn trend_for<S: FeatureSource>(feature: &str, current: f64, history: &[S]) -> Trend {
    let values: Vec<f64> = history
        .iter()
        .filter_map(|record| record.feature(feature))
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Trend {
            feature: feature.to_string(),
            current,
            average: current,
            classification: TrendClass::Stable,
            change_percent: 0.0,
        };
    }

    let average = values.iter().sum::<f64>() / values.len() as f64;
    let change_percent = if average == 0.0 {
        0.0
    } else {
        (current - average) / average.abs() * 100.0
    };

    let classification = if change_percent.abs() < STABLE_BAND_PCT {
        TrendClass::Stable
    } else if change_percent > 0.0 {
        TrendClass::Increasing
    } else {
        TrendClass::Decreasing
    };

    Trend {
        feature: feature.to_string(),
        current,
        average,
        classification,
        change_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Direction;
    use serde_json::{json, Value};

    fn obs(label: &str, value: f64) -> FeatureObservation {
        FeatureObservation {
            label: label.into(),
            value,
            threshold: 0.0,
            direction: Direction::Left,
        }
    }

    #[test]
    fn test_empty_history_is_all_stable() {
        let current = json!({ "sleep_hours": 6.0 });
        let trends = compute_trends::<Value>(&current, &[], &[obs("sleep_hours", 6.0)]);

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].classification, TrendClass::Stable);
        assert_eq!(trends[0].average, 6.0);
        assert_eq!(trends[0].change_percent, 0.0);
    }

    #[test]
    fn test_increase_beyond_band_classified() {
        let current = json!({ "stress_level": 8.0 });
        let history = vec![json!({ "stress_level": 4.0 }), json!({ "stress_level": 6.0 })];
        let trends = compute_trends(&current, &history, &[obs("stress_level", 8.0)]);

        assert_eq!(trends[0].average, 5.0);
        assert_eq!(trends[0].change_percent, 60.0);
        assert_eq!(trends[0].classification, TrendClass::Increasing);
    }

    #[test]
    fn test_decrease_beyond_band_classified() {
        let current = json!({ "sleep_hours": 5.0 });
        let history = vec![json!({ "sleep_hours": 8.0 })];
        let trends = compute_trends(&current, &history, &[obs("sleep_hours", 5.0)]);

        assert_eq!(trends[0].classification, TrendClass::Decreasing);
        assert!(trends[0].change_percent < 0.0);
    }

    #[test]
    fn test_within_band_is_stable() {
        let current = json!({ "x": 104.9 });
        let history = vec![json!({ "x": 100.0 })];
        let trends = compute_trends(&current, &history, &[obs("x", 104.9)]);
        assert_eq!(trends[0].classification, TrendClass::Stable);

        let current = json!({ "x": 105.0 });
        let trends = compute_trends(&current, &history, &[obs("x", 105.0)]);
        assert_eq!(trends[0].classification, TrendClass::Increasing);
    }

    #[test]
    fn test_zero_average_guard() {
        let current = json!({ "x": 3.0 });
        let history = vec![json!({ "x": 0.0 }), json!({ "x": 0.0 })];
        let trends = compute_trends(&current, &history, &[obs("x", 3.0)]);

        assert_eq!(trends[0].change_percent, 0.0);
        assert_eq!(trends[0].classification, TrendClass::Stable);
    }

    #[test]
    fn test_scale_invariance_of_change_percent() {
        let base_current = json!({ "x": 12.0 });
        let base_history = vec![json!({ "x": 10.0 }), json!({ "x": 8.0 })];
        let base = compute_trends(&base_current, &base_history, &[obs("x", 12.0)]);

        let k = 37.5;
        let scaled_current = json!({ "x": 12.0 * k });
        let scaled_history = vec![json!({ "x": 10.0 * k }), json!({ "x": 8.0 * k })];
        let scaled = compute_trends(&scaled_current, &scaled_history, &[obs("x", 12.0 * k)]);

        assert!((base[0].change_percent - scaled[0].change_percent).abs() < 1e-9);
        assert_eq!(base[0].classification, scaled[0].classification);
    }

    #[test]
    fn test_records_without_feature_excluded_from_mean() {
        let current = json!({ "x": 10.0 });
        let history = vec![
            json!({ "x": 10.0 }),
            json!({ "other": 1.0 }),
            json!({ "x": "bad" }),
        ];
        let trends = compute_trends(&current, &history, &[obs("x", 10.0)]);
        assert_eq!(trends[0].average, 10.0);
    }

    #[test]
    fn test_duplicate_path_features_deduplicated() {
        let current = json!({ "sleep_hours": 5.0, "stress_level": 2.0 });
        let path = vec![
            obs("sleep_hours", 5.0),
            obs("stress_level", 2.0),
            obs("sleep_hours", 5.0),
        ];
        let trends = compute_trends::<Value>(&current, &[], &path);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].feature, "sleep_hours");
        assert_eq!(trends[1].feature, "stress_level");
    }
}

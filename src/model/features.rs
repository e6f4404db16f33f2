//! Daily feature snapshot
//!
//! The `general` namespace holds one of these per day. All eleven features
//! are numeric so the decision tree can threshold any of them; booleans
//! from upstream collectors (hydration, skipped meals) arrive as 0.0/1.0.

use serde::{Deserialize, Serialize};

use crate::tree::FeatureSource;

/// Current wire version of [`DailyFeatures`]
pub const DAILY_FEATURES_SCHEMA_VERSION: u32 = 1;

/// Feature names the bundled tree and explanation templates know about,
/// in snapshot field order.
pub const FEATURE_NAMES: [&str; 11] = [
    "sleep_hours",
    "screen_time_hours",
    "stress_level",
    "prodrome_symptoms",
    "attacks_last_7_days",
    "attacks_last_30_days",
    "days_since_last_attack",
    "hydration_low",
    "skipped_meal",
    "bright_light_exposure",
    "pressure_drop",
];

/// One day's feature snapshot, the prediction input shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatures {
    /// Payload schema version tag
    #[serde(default = "schema_version_default")]
    pub schema_version: u32,
    /// Hours slept the previous night
    pub sleep_hours: f64,
    /// Screen time so far today, hours
    pub screen_time_hours: f64,
    /// Self-reported stress, 0-10
    pub stress_level: f64,
    /// Count of prodrome symptoms reported today
    pub prodrome_symptoms: f64,
    /// Attacks in the trailing 7 days
    pub attacks_last_7_days: f64,
    /// Attacks in the trailing 30 days
    pub attacks_last_30_days: f64,
    /// Days since the most recent attack
    pub days_since_last_attack: f64,
    /// 1.0 when hydration was low today
    pub hydration_low: f64,
    /// 1.0 when a meal was skipped today
    pub skipped_meal: f64,
    /// Bright light exposure, hours
    pub bright_light_exposure: f64,
    /// Barometric pressure drop over the last 24h, hPa
    pub pressure_drop: f64,
}

fn schema_version_default() -> u32 {
    DAILY_FEATURES_SCHEMA_VERSION
}

impl Default for DailyFeatures {
    fn default() -> Self {
        Self {
            schema_version: DAILY_FEATURES_SCHEMA_VERSION,
            sleep_hours: 0.0,
            screen_time_hours: 0.0,
            stress_level: 0.0,
            prodrome_symptoms: 0.0,
            attacks_last_7_days: 0.0,
            attacks_last_30_days: 0.0,
            days_since_last_attack: 0.0,
            hydration_low: 0.0,
            skipped_meal: 0.0,
            bright_light_exposure: 0.0,
            pressure_drop: 0.0,
        }
    }
}

impl FeatureSource for DailyFeatures {
    fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "sleep_hours" => self.sleep_hours,
            "screen_time_hours" => self.screen_time_hours,
            "stress_level" => self.stress_level,
            "prodrome_symptoms" => self.prodrome_symptoms,
            "attacks_last_7_days" => self.attacks_last_7_days,
            "attacks_last_30_days" => self.attacks_last_30_days,
            "days_since_last_attack" => self.days_since_last_attack,
            "hydration_low" => self.hydration_low,
            "skipped_meal" => self.skipped_meal,
            "bright_light_exposure" => self.bright_light_exposure,
            "pressure_drop" => self.pressure_drop,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_feature_resolves() {
        let features = DailyFeatures::default();
        for name in FEATURE_NAMES {
            assert!(features.feature(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_feature_is_none() {
        assert!(DailyFeatures::default().feature("caffeine_mg").is_none());
    }

    #[test]
    fn test_schema_version_defaults_on_old_payloads() {
        // a payload written before the schema tag existed
        let json = r#"{
            "sleep_hours": 6.5, "screen_time_hours": 4.0, "stress_level": 3.0,
            "prodrome_symptoms": 0.0, "attacks_last_7_days": 1.0,
            "attacks_last_30_days": 2.0, "days_since_last_attack": 4.0,
            "hydration_low": 0.0, "skipped_meal": 1.0,
            "bright_light_exposure": 2.0, "pressure_drop": 0.0
        }"#;
        let features: DailyFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(features.schema_version, DAILY_FEATURES_SCHEMA_VERSION);
        assert_eq!(features.sleep_hours, 6.5);
    }
}

//! Typed payloads for the non-prediction namespaces
//!
//! Each payload carries a `schema_version` tag so future shape changes can
//! be migrated on read. Upstream collectors (UI, pollers) own the payload
//! semantics; this crate only stores and returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn v1() -> u32 {
    1
}

/// A logged migraine attack (`migraines` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    #[serde(default = "v1")]
    pub schema_version: u32,
    /// When the attack started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    /// Duration in minutes, if the attack has ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Pain intensity, 0-10
    pub intensity: u8,
    /// Free-form symptom labels
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Medication taken, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
}

/// Device permission state (`permissions` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionState {
    #[serde(default = "v1")]
    pub schema_version: u32,
    /// Permission name as the platform reports it
    pub name: String,
    /// Granted or not, as of `checked_at`
    pub granted: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub checked_at: DateTime<Utc>,
}

/// A location sample (`geolocation` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    #[serde(default = "v1")]
    pub schema_version: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub sampled_at: DateTime<Utc>,
}

/// A weather sample (`weather` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    #[serde(default = "v1")]
    pub schema_version: u32,
    /// Barometric pressure, hPa
    pub pressure_hpa: f64,
    /// Temperature, degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity, percent
    pub humidity_pct: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub sampled_at: DateTime<Utc>,
}

/// A calendar event summary (`calendar` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default = "v1")]
    pub schema_version: u32,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ends_at: DateTime<Utc>,
    /// Heuristic busy-ness weight assigned by the collector
    #[serde(default)]
    pub load: f64,
}

/// A wearable device sample (`wearables` namespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableSample {
    #[serde(default = "v1")]
    pub schema_version: u32,
    /// Resting heart rate, bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<f64>,
    /// Heart-rate variability, ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hrv_ms: Option<f64>,
    /// Sleep duration measured by the device, hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub sampled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_attack_timestamps_serialize_as_ms_epoch() {
        let attack = AttackRecord {
            schema_version: 1,
            started_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            duration_minutes: Some(90),
            intensity: 7,
            symptoms: vec!["aura".into(), "nausea".into()],
            medication: None,
        };
        let value = serde_json::to_value(&attack).unwrap();
        assert_eq!(value["started_at"], serde_json::json!(1_700_000_000_000_i64));
        assert!(value.get("medication").is_none());
    }

    #[test]
    fn test_schema_version_defaults_when_absent() {
        let json = r#"{
            "name": "notifications", "granted": true, "checked_at": 1700000000000
        }"#;
        let state: PermissionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.schema_version, 1);
        assert!(state.granted);
    }

    #[test]
    fn test_wearable_optional_fields_roundtrip() {
        let sample = WearableSample {
            schema_version: 1,
            resting_heart_rate: Some(52.0),
            hrv_ms: None,
            sleep_hours: Some(7.2),
            sampled_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        };
        let json = serde_json::to_string(&sample).unwrap();
        let back: WearableSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}

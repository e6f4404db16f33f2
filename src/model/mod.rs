//! Data model for auradb
//!
//! The namespace enumeration plus one concrete, schema-version-tagged
//! payload struct per namespace. Payloads are decoded explicitly on read;
//! nothing in the storage path is structurally typed.

mod features;
mod namespace;
mod payloads;

pub use features::{DailyFeatures, DAILY_FEATURES_SCHEMA_VERSION, FEATURE_NAMES};
pub use namespace::Namespace;
pub use payloads::{
    AttackRecord, CalendarEvent, GeoSample, PermissionState, WearableSample, WeatherSample,
};

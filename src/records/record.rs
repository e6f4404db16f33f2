//! Stored record wire shape
//!
//! Every namespace persists the same envelope: the application-chosen id,
//! an opaque JSON payload, and two engine-indexed millisecond-epoch
//! timestamps. `createdAt` is fixed at first insertion; `updatedAt` moves
//! on every write.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::RecordKey;

/// One persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Application-chosen key, unique within the namespace
    pub id: RecordKey,
    /// Namespace-specific payload
    pub data: Value,
    /// First insertion time
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Last write time
    #[serde(rename = "updatedAt", with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Decodes the payload into a concrete type
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// Serializes the record into the engine row shape
    pub fn to_row(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Parses a record back out of an engine row
    pub fn from_row(row: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> StoredRecord {
        StoredRecord {
            id: RecordKey::from("2024-05-01"),
            data: json!({ "sleep_hours": 6.5 }),
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            updated_at: Utc.timestamp_millis_opt(1_700_000_400_000).unwrap(),
        }
    }

    #[test]
    fn test_row_roundtrip() {
        let record = sample();
        let row = record.to_row().unwrap();
        assert_eq!(row["createdAt"], json!(1_700_000_000_000_i64));
        assert_eq!(row["updatedAt"], json!(1_700_000_400_000_i64));

        let back = StoredRecord::from_row(row).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_data_as_decodes_payload() {
        #[derive(Deserialize)]
        struct Payload {
            sleep_hours: f64,
        }
        let payload: Payload = sample().data_as().unwrap();
        assert_eq!(payload.sleep_hours, 6.5);
    }
}

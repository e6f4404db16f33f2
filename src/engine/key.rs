//! Store key type
//!
//! Keys are application-chosen: a 64-bit signed integer or a UTF-8 string.
//! Total ordering follows the host key model this engine replaces: every
//! integer key sorts before every string key, each kind by its natural
//! order. Scans over a store therefore return integer-keyed records first.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A record's primary key within one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    /// 64-bit signed integer key
    Int(i64),
    /// UTF-8 string key
    Str(String),
}

impl RecordKey {
    /// Rank used to order key kinds against each other (integers first).
    fn kind_rank(&self) -> u8 {
        match self {
            RecordKey::Int(_) => 0,
            RecordKey::Str(_) => 1,
        }
    }
}

impl Ord for RecordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RecordKey::Int(a), RecordKey::Int(b)) => a.cmp(b),
            (RecordKey::Str(a), RecordKey::Str(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for RecordKey {
    fn from(v: i64) -> Self {
        RecordKey::Int(v)
    }
}

impl From<&str> for RecordKey {
    fn from(v: &str) -> Self {
        RecordKey::Str(v.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(v: String) -> Self {
        RecordKey::Str(v)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Int(v) => write!(f, "{}", v),
            RecordKey::Str(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_sort_before_strings() {
        let mut keys = vec![
            RecordKey::from("alpha"),
            RecordKey::from(10),
            RecordKey::from("0"),
            RecordKey::from(-3),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                RecordKey::from(-3),
                RecordKey::from(10),
                RecordKey::from("0"),
                RecordKey::from("alpha"),
            ]
        );
    }

    #[test]
    fn test_serde_untagged_roundtrip() {
        let int_key: RecordKey = serde_json::from_str("42").unwrap();
        assert_eq!(int_key, RecordKey::Int(42));

        let str_key: RecordKey = serde_json::from_str("\"2024-05-01\"").unwrap();
        assert_eq!(str_key, RecordKey::Str("2024-05-01".into()));

        assert_eq!(serde_json::to_string(&int_key).unwrap(), "42");
        assert_eq!(serde_json::to_string(&str_key).unwrap(), "\"2024-05-01\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(RecordKey::from(7).to_string(), "7");
        assert_eq!(RecordKey::from("day-1").to_string(), "day-1");
    }
}

//! Application namespaces
//!
//! The fixed set of logical stores the application uses. The registry
//! creates all of them in one upgrade the first time any is requested, so
//! adding a variant here is the whole cost of adding a namespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A logical record namespace ("store")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Daily feature snapshot used for prediction
    General,
    /// Attack log
    Migraines,
    /// Granted/denied device permission state
    Permissions,
    /// Location samples
    Geolocation,
    /// Weather samples
    Weather,
    /// Calendar events
    Calendar,
    /// Wearable device samples
    Wearables,
}

impl Namespace {
    /// Every namespace the application uses
    pub const ALL: [Namespace; 7] = [
        Namespace::General,
        Namespace::Migraines,
        Namespace::Permissions,
        Namespace::Geolocation,
        Namespace::Weather,
        Namespace::Calendar,
        Namespace::Wearables,
    ];

    /// Store name as persisted in the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::General => "general",
            Namespace::Migraines => "migraines",
            Namespace::Permissions => "permissions",
            Namespace::Geolocation => "geolocation",
            Namespace::Weather => "weather",
            Namespace::Calendar => "calendar",
            Namespace::Wearables => "wearables",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .iter()
            .find(|ns| ns.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown namespace '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_variant() {
        assert_eq!(Namespace::ALL.len(), 7);
    }

    #[test]
    fn test_roundtrip_through_str() {
        for ns in Namespace::ALL {
            assert_eq!(ns.as_str().parse::<Namespace>().unwrap(), ns);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("notifications".parse::<Namespace>().is_err());
    }
}

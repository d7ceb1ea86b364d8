use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a run took place. Closed set: anything else is rejected at the
/// boundary, both on the wire and when reading back from storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Indoor,
    Outdoor,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown location: {0}")]
pub struct UnknownLocation(pub String);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Indoor => write!(f, "INDOOR"),
            Location::Outdoor => write!(f, "OUTDOOR"),
        }
    }
}

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INDOOR" => Ok(Location::Indoor),
            "OUTDOOR" => Ok(Location::Outdoor),
            other => Err(UnknownLocation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_round_trips_through_text() {
        for location in [Location::Indoor, Location::Outdoor] {
            let parsed = location.to_string().parse::<Location>().unwrap();
            assert_eq!(parsed, location);
        }
    }

    #[test]
    fn location_rejects_unknown_variant() {
        let err = "TREADMILL".parse::<Location>().unwrap_err();
        assert_eq!(err, UnknownLocation("TREADMILL".to_string()));
    }

    #[test]
    fn location_serializes_as_variant_name() {
        let json = serde_json::to_string(&Location::Indoor).unwrap();
        assert_eq!(json, "\"INDOOR\"");
        let back: Location = serde_json::from_str("\"OUTDOOR\"").unwrap();
        assert_eq!(back, Location::Outdoor);
    }
}

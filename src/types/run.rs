use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// One logged workout. A plain value with caller-supplied id; the record
/// may arrive straight from a deserialized payload, so construction checks
/// nothing and validation happens at the repository write boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: i64,
    pub title: String,
    pub started_on: DateTime<Utc>,
    pub completed_on: DateTime<Utc>,
    pub miles: i64,
    pub location: Location,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::InputSnapshot;

pub type ScenarioId = i64;

/// A named, persisted copy of an input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unix_epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub data: InputSnapshot,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

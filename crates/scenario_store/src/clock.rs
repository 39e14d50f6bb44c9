use chrono::{DateTime, Utc};

use models::ScenarioId;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Millisecond timestamp id, bumped past `last` so ids stay unique and
/// increasing even when several scenarios are created in the same instant
/// or the wall clock steps backwards. `None` once `last` is `ScenarioId::MAX`.
pub fn next_id(now: DateTime<Utc>, last: Option<ScenarioId>) -> Option<ScenarioId> {
    let candidate = now.timestamp_millis();
    match last {
        Some(last) if last >= candidate => last.checked_add(1),
        _ => Some(candidate),
    }
}

use models::{InputSnapshot, Scenario, ScenarioId};

use crate::backend::KeyValueStore;
use crate::clock::{next_id, Clock, SystemClock};

/// Named scenarios persisted as one JSON array under a single key.
///
/// The collection is read once when the store opens and rewritten in full
/// after every mutation. Backend failures never reach the caller: a failed
/// read yields an empty collection, a failed write keeps the mutation in
/// memory and flips [`ScenarioStore::is_synced`] to false. Both are logged.
pub struct ScenarioStore<S, C = SystemClock> {
    backend: S,
    key: String,
    clock: C,
    scenarios: Vec<Scenario>,
    synced: bool,
}

impl<S: KeyValueStore> ScenarioStore<S> {
    pub fn open(backend: S, key: impl Into<String>) -> Self {
        Self::with_clock(backend, key, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ScenarioStore<S, C> {
    pub fn with_clock(backend: S, key: impl Into<String>, clock: C) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            clock,
            scenarios: Vec::new(),
            synced: true,
        };
        store.load_all();
        store
    }

    /// Re-reads the persisted collection, replacing what is in memory.
    pub fn load_all(&mut self) -> Vec<Scenario> {
        self.scenarios = self.read_collection();
        self.synced = true;
        self.scenarios.clone()
    }

    fn read_collection(&self) -> Vec<Scenario> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read scenarios under '{}': {}", self.key, e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Scenario>>(&raw) {
            Ok(scenarios) => {
                tracing::debug!("Loaded {} scenarios from '{}'", scenarios.len(), self.key);
                scenarios
            }
            Err(e) => {
                tracing::warn!(
                    "Stored scenarios under '{}' are corrupt, starting empty: {}",
                    self.key,
                    e
                );
                Vec::new()
            }
        }
    }

    fn persist(&mut self) {
        let written = serde_json::to_string(&self.scenarios)
            .map_err(Into::into)
            .and_then(|json| self.backend.set(&self.key, &json));
        match written {
            Ok(()) => {
                self.synced = true;
                tracing::debug!("Persisted {} scenarios to '{}'", self.scenarios.len(), self.key);
            }
            Err(e) => {
                self.synced = false;
                tracing::error!(
                    "Failed to persist scenarios to '{}', in-memory copy diverges from storage: {}",
                    self.key,
                    e
                );
            }
        }
    }

    /// Saves a copy of `input` under a fresh id. A blank name becomes
    /// "Scenario N".
    pub fn save_new(&mut self, name: &str, input: &InputSnapshot) -> Scenario {
        let now = self.clock.now();
        let last = self.scenarios.iter().map(|s| s.id).max();
        let name = match name.trim() {
            "" => format!("Scenario {}", self.scenarios.len() + 1),
            trimmed => trimmed.to_string(),
        };
        let id = match next_id(now, last) {
            Some(id) => id,
            None => {
                let id = self.unused_id();
                tracing::warn!(
                    "Scenario ids under '{}' are exhausted, reusing free id {}",
                    self.key,
                    id
                );
                id
            }
        };
        let scenario = Scenario {
            id,
            name,
            created_at: now,
            data: input.clone(),
        };
        self.scenarios.push(scenario.clone());
        self.persist();
        scenario
    }

    fn unused_id(&self) -> ScenarioId {
        (1..=ScenarioId::MAX)
            .find(|id| self.scenarios.iter().all(|s| s.id != *id))
            .unwrap_or_default()
    }

    /// Replaces the data of scenario `id`. Returns false if it does not exist.
    pub fn update(&mut self, id: ScenarioId, input: &InputSnapshot) -> bool {
        let Some(scenario) = self.scenarios.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        scenario.data = input.clone();
        self.persist();
        true
    }

    pub fn delete(&mut self, id: ScenarioId) -> bool {
        let before = self.scenarios.len();
        self.scenarios.retain(|s| s.id != id);
        if self.scenarios.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn find(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// False after a write failed and until a later write succeeds.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

use analysis_engine::{compute, render_report};
use models::{InputSnapshot, MetricsSnapshot, Scenario, ScenarioId};

use crate::backend::KeyValueStore;
use crate::clock::{Clock, SystemClock};
use crate::store::ScenarioStore;

/// The live analysis being edited plus which saved scenario, if any, it
/// came from. The selection is never persisted.
pub struct Session<S, C = SystemClock> {
    store: ScenarioStore<S, C>,
    current: InputSnapshot,
    selected: Option<ScenarioId>,
}

impl<S: KeyValueStore, C: Clock> Session<S, C> {
    pub fn new(store: ScenarioStore<S, C>) -> Self {
        Self {
            store,
            current: InputSnapshot::default(),
            selected: None,
        }
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut InputSnapshot {
        &mut self.current
    }

    pub fn replace_current(&mut self, input: InputSnapshot) {
        self.current = input;
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        compute(&self.current)
    }

    pub fn report(&self) -> String {
        render_report(&self.current, &self.metrics())
    }

    pub fn selected(&self) -> Option<&Scenario> {
        self.selected.and_then(|id| self.store.find(id))
    }

    /// Loads a copy of scenario `id` into the live form.
    pub fn select(&mut self, id: ScenarioId) -> bool {
        match self.store.find(id) {
            Some(scenario) => {
                self.current = scenario.data.clone();
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }

    /// Starts over from the default assumptions with nothing selected.
    pub fn new_analysis(&mut self) {
        self.current = InputSnapshot::default();
        self.selected = None;
    }

    /// Writes the live form over the selected scenario. `None` when nothing
    /// is selected or the selection has disappeared.
    pub fn save(&mut self) -> Option<Scenario> {
        let id = self.selected?;
        if !self.store.update(id, &self.current) {
            self.selected = None;
            return None;
        }
        self.store.find(id).cloned()
    }

    pub fn save_as_new(&mut self, name: &str) -> Scenario {
        let scenario = self.store.save_new(name, &self.current);
        self.selected = Some(scenario.id);
        scenario
    }

    /// Deletes scenario `id`, dropping the selection if it pointed there.
    /// The live form keeps its values.
    pub fn delete(&mut self, id: ScenarioId) -> bool {
        let deleted = self.store.delete(id);
        if deleted && self.selected == Some(id) {
            self.selected = None;
        }
        deleted
    }

    pub fn store(&self) -> &ScenarioStore<S, C> {
        &self.store
    }
}

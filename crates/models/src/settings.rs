use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Contents of `settings.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory backing the file key-value store
    pub storage_dir: PathBuf,
    /// Key under which the scenario collection is stored
    pub scenarios_key: String,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("data"),
            scenarios_key: "multifamily_roi_scenarios".to_string(),
            log_filter: "info".to_string(),
            pretty_json: true,
        }
    }
}

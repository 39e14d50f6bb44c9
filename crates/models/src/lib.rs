//! Shared data model for the multifamily ROI analyzer: the input set a user
//! edits, the metrics derived from it, persisted scenarios and settings.

pub mod coerce;
pub mod input;
pub mod metrics;
pub mod scenario;
pub mod settings;

pub use coerce::parse_number;
pub use input::{FIELD_NAMES, FieldError, InputSnapshot, ManagementFee, ManagementMode, Unit};
pub use metrics::{DscrStatus, MetricsSnapshot};
pub use scenario::{Scenario, ScenarioId};
pub use settings::Settings;

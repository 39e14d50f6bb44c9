//! Scenario persistence over a swappable key-value backend.

pub mod backend;
pub mod clock;
pub mod error;
pub mod session;
pub mod store;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use clock::{Clock, SystemClock};
pub use error::{Result, StoreError};
pub use session::Session;
pub use store::ScenarioStore;

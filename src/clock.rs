//! Source of "now". Production uses `mockable::DefaultClock`; [`FixedClock`]
//! pins the instant for tests and reproducible runs.
use chrono::{DateTime, Local, Utc};
pub use mockable::{Clock, DefaultClock};

/// Shared handle stored in the application state.
pub type SharedClock = std::sync::Arc<dyn Clock + Send + Sync>;

/// `Clock` that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

//! A clinic together with its pre-iteration state and policy decision.

use chrono::{DateTime, Utc};

use super::clinic::Clinic;
use super::policy::Decision;

/// One clinic as seen during a single polling iteration.
#[derive(Debug)]
pub struct Observation {
    /// Name of the scraper that produced the clinic.
    pub scraper: String,
    pub clinic: Box<dyn Clinic>,
    /// Count persisted by the previous iteration.
    pub last_count: i64,
    pub last_post: Option<DateTime<Utc>>,
    pub decision: Decision,
}

impl Observation {
    #[must_use]
    pub fn new_appointments(&self) -> i64 {
        i64::from(self.clinic.appointments()) - self.last_count
    }

    #[must_use]
    pub fn should_notify(&self) -> bool {
        self.decision.notify()
    }
}

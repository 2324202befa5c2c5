//! Clinic model and the notification decision rules.

pub mod clinic;
pub mod observation;
pub mod policy;
pub mod session;
pub mod split;
pub mod threshold;

pub use clinic::{render_appointments, section_block, Clinic, NotificationText};
pub use observation::Observation;
pub use policy::{decide, evaluate, Decision, PolicyInput, Verdict};
pub use session::SessionCookies;
pub use split::{pack_items, weighted_length, ITEM_SEPARATOR, LINK_WEIGHT};
pub use threshold::{ClinicClass, NotificationThresholds, ThresholdTable};

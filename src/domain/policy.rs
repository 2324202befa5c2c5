//! Delta, threshold and cooldown policy.
//!
//! The count baseline is rewritten every iteration, so `new_appointments`
//! always means "since the previous poll". Cooldown independently throttles
//! how often a clinic can be posted about.

use chrono::{DateTime, Utc};

use super::clinic::Clinic;
use super::threshold::NotificationThresholds;

/// Why a clinic was or was not selected for notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Notify,
    NoLink,
    BelowMinimum,
    InsufficientIncrease,
    CoolingDown,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notify => "notify",
            Self::NoLink => "no_link",
            Self::BelowMinimum => "below_minimum",
            Self::InsufficientIncrease => "insufficient_increase",
            Self::CoolingDown => "cooling_down",
        }
    }
}

/// Outcome of evaluating one clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    pub new_appointments: i64,
}

impl Decision {
    #[must_use]
    pub const fn notify(&self) -> bool {
        matches!(self.verdict, Verdict::Notify)
    }
}

/// Raw inputs to the policy, independent of any clinic type.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput {
    pub appointments: i64,
    pub last_count: i64,
    pub has_link: bool,
    pub last_post: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

/// Evaluate the policy on raw numbers.
///
/// Count thresholds are inclusive. The cooldown must be strictly exceeded;
/// a clinic that was never posted about has no cooldown to wait out.
#[must_use]
pub fn evaluate(input: PolicyInput, thresholds: &NotificationThresholds) -> Decision {
    let new_appointments = input.appointments - input.last_count;

    let verdict = if !input.has_link {
        Verdict::NoLink
    } else if input.appointments < thresholds.min_absolute {
        Verdict::BelowMinimum
    } else if new_appointments < thresholds.min_increase {
        Verdict::InsufficientIncrease
    } else if !cooldown_elapsed(input.last_post, input.now, thresholds) {
        Verdict::CoolingDown
    } else {
        Verdict::Notify
    };

    Decision {
        verdict,
        new_appointments,
    }
}

/// Decide whether `clinic` should be announced.
#[must_use]
pub fn decide(
    clinic: &dyn Clinic,
    last_count: i64,
    last_post: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: &NotificationThresholds,
) -> Decision {
    evaluate(
        PolicyInput {
            appointments: i64::from(clinic.appointments()),
            last_count,
            has_link: clinic.link().is_some(),
            last_post,
            now,
        },
        thresholds,
    )
}

fn cooldown_elapsed(
    last_post: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: &NotificationThresholds,
) -> bool {
    let Some(last_post) = last_post else {
        return true;
    };
    // An out-of-range cooldown can never be exceeded.
    let Ok(cooldown) = chrono::Duration::from_std(thresholds.cooldown) else {
        return false;
    };
    now.signed_duration_since(last_post) > cooldown
}

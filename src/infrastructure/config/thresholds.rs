//! Notification threshold overrides.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ClinicClass, NotificationThresholds, ThresholdTable};

/// Overrides for one clinic class. Unset fields keep the class default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdOverride {
    pub min_absolute: Option<i64>,
    pub min_increase: Option<i64>,
    pub cooldown_secs: Option<u64>,
}

impl ThresholdOverride {
    /// Apply the overrides on top of the built-in defaults for `class`.
    #[must_use]
    pub fn resolve(&self, class: ClinicClass) -> NotificationThresholds {
        let defaults = NotificationThresholds::default_for(class);
        NotificationThresholds {
            min_absolute: self.min_absolute.unwrap_or(defaults.min_absolute),
            min_increase: self.min_increase.unwrap_or(defaults.min_increase),
            cooldown: self
                .cooldown_secs
                .map_or(defaults.cooldown, Duration::from_secs),
        }
    }
}

/// `[thresholds.clinic]` and `[thresholds.pharmacy]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub clinic: ThresholdOverride,
    pub pharmacy: ThresholdOverride,
}

impl ThresholdsConfig {
    #[must_use]
    pub fn table(&self) -> ThresholdTable {
        ThresholdTable::new(
            self.clinic.resolve(ClinicClass::Clinic),
            self.pharmacy.resolve(ClinicClass::Pharmacy),
        )
    }
}

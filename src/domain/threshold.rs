//! Notification thresholds per clinic class.

use std::time::Duration;

use serde::Deserialize;

/// Broad category of a clinic, used to pick default thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicClass {
    /// A single site on a single date.
    #[default]
    Clinic,
    /// A pharmacy chain rolled up state-wide.
    Pharmacy,
}

impl ClinicClass {
    /// Lowercase name used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clinic => "clinic",
            Self::Pharmacy => "pharmacy",
        }
    }
}

impl std::fmt::Display for ClinicClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three tunables of the notification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationThresholds {
    /// Minimum current appointments to ever notify.
    pub min_absolute: i64,
    /// Minimum increase since the previous poll.
    pub min_increase: i64,
    /// Minimum time since the last post for this clinic.
    pub cooldown: Duration,
}

impl NotificationThresholds {
    /// Defaults for an ordinary clinic.
    pub const CLINIC: Self = Self {
        min_absolute: 20,
        min_increase: 10,
        cooldown: Duration::from_secs(30 * 60),
    };

    /// Defaults for a pharmacy roll-up.
    pub const PHARMACY: Self = Self {
        min_absolute: 10,
        min_increase: 5,
        cooldown: Duration::from_secs(60 * 60),
    };

    /// Built-in defaults for a class.
    #[must_use]
    pub const fn default_for(class: ClinicClass) -> Self {
        match class {
            ClinicClass::Clinic => Self::CLINIC,
            ClinicClass::Pharmacy => Self::PHARMACY,
        }
    }
}

/// Thresholds for every clinic class, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdTable {
    clinic: NotificationThresholds,
    pharmacy: NotificationThresholds,
}

impl ThresholdTable {
    #[must_use]
    pub const fn new(clinic: NotificationThresholds, pharmacy: NotificationThresholds) -> Self {
        Self { clinic, pharmacy }
    }

    /// Thresholds that apply to `class`.
    #[must_use]
    pub const fn get(&self, class: ClinicClass) -> NotificationThresholds {
        match class {
            ClinicClass::Clinic => self.clinic,
            ClinicClass::Pharmacy => self.pharmacy,
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new(NotificationThresholds::CLINIC, NotificationThresholds::PHARMACY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_uses_class_defaults() {
        let table = ThresholdTable::default();
        assert_eq!(table.get(ClinicClass::Clinic).min_absolute, 20);
        assert_eq!(table.get(ClinicClass::Clinic).min_increase, 10);
        assert_eq!(
            table.get(ClinicClass::Clinic).cooldown,
            Duration::from_secs(1800)
        );
        assert_eq!(table.get(ClinicClass::Pharmacy).min_absolute, 10);
        assert_eq!(table.get(ClinicClass::Pharmacy).min_increase, 5);
        assert_eq!(
            table.get(ClinicClass::Pharmacy).cooldown,
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn table_returns_overrides() {
        let custom = NotificationThresholds {
            min_absolute: 1,
            min_increase: 1,
            cooldown: Duration::from_secs(5),
        };
        let table = ThresholdTable::new(custom, NotificationThresholds::PHARMACY);
        assert_eq!(table.get(ClinicClass::Clinic), custom);
        assert_eq!(
            table.get(ClinicClass::Pharmacy),
            NotificationThresholds::PHARMACY
        );
    }

    #[test]
    fn class_names() {
        assert_eq!(ClinicClass::Clinic.to_string(), "clinic");
        assert_eq!(ClinicClass::Pharmacy.as_str(), "pharmacy");
    }
}

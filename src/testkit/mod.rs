//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clinic`] - `MockClinic` and an `observation` builder.
//! - [`scraper`] - `StaticScraper` with swappable results, `FailingScraper`.
//! - [`notifier`] - `RecordingNotifier`, `FailingNotifier`, `PartialNotifier`.
//! - [`reporter`] - `RecordingReporter`.
//! - [`store`] - `FailingStore`.

pub mod clinic;
pub mod notifier;
pub mod reporter;
pub mod scraper;
pub mod store;

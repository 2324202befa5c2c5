//! Polling orchestration.
//!
//! Each iteration runs every scraper behind its own error boundary, applies
//! the notification policy to the clinics they return, fans the selected
//! clinics out to every notifier and finally persists the new state.
//!
//! # Modules
//!
//! - [`orchestrator`]: the iteration and the outer loop
//! - [`boundary`]: per-adapter and per-channel failure isolation
//! - [`pacing`]: sleep computation between iterations

pub mod boundary;
pub mod orchestrator;
pub mod pacing;

pub use boundary::{catch_errors, ErrorPolicy};
pub use orchestrator::{IterationReport, Orchestrator, OrchestratorBuilder, DEFAULT_INTERVAL};

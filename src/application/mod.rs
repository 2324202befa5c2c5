//! Application services (use cases).
//!
//! These services coordinate the domain policy with the scraper, store and
//! notifier ports.

pub mod orchestration;

pub use orchestration::{ErrorPolicy, IterationReport, Orchestrator, OrchestratorBuilder};

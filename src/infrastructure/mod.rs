//! Infrastructure layer.
//!
//! Configuration loading and the wiring of adapters into the orchestrator.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;

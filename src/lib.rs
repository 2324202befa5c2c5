//! Slotwatch - vaccine appointment availability watcher.
//!
//! Periodically polls third-party scheduling sites, compares what it finds
//! with the counts persisted by the previous pass, and announces clinics
//! with meaningful new availability on chat and microblog channels.
//!
//! # Modules
//!
//! - [`domain`] - Clinic model, thresholds and the notification policy
//! - [`port`] - Traits for scrapers, notifiers, the store and error reporting
//! - [`adapter`] - Site scrapers, channel notifiers, stores and the CLI
//! - [`application`] - The polling loop and error isolation
//! - [`infrastructure`] - Configuration and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` - Telegram channel via teloxide (default)
//! - `testkit` - Scripted scrapers and recording notifiers for tests
//!
//! # Example
//!
//! ```no_run
//! use slotwatch::infrastructure::bootstrap::{build_orchestrator, RunOptions};
//! use slotwatch::infrastructure::config::Config;
//!
//! # async fn demo() -> slotwatch::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! let orchestrator = build_orchestrator(&config, &RunOptions::default())?;
//! orchestrator.seed().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where external systems plug in: the third-party
//! scheduling sites, the key-value store, the notification channels and the
//! error-tracking collaborator.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Scraper │            │   Store     │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::notifier::{LogNotifier, Notifier, NotifierRegistry, NullNotifier};
pub use outbound::reporter::{ErrorReporter, NullReporter, TracingReporter};
pub use outbound::scraper::Scraper;
pub use outbound::store::{KeyValueStore, StateStore};

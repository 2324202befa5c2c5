//! SQLite persistence adapter.
//!
//! Durable [`crate::port::KeyValueStore`] backed by a single table.

pub mod database;
pub mod store;

pub use store::SqliteStore;

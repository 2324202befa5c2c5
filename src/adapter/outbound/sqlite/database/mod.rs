//! SQLite database modules.
//!
//! Provides connection management, the schema and the Diesel row type for
//! the key-value table.

pub mod connection;
pub mod model;
pub mod schema;

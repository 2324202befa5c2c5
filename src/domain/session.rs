//! Cached third-party session cookies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cookies captured from an external site together with their expiry.
///
/// The cookie payload is opaque to the core; only the adapter that wrote it
/// knows its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCookies {
    pub cookies: Value,
    pub expiration: DateTime<Utc>,
}

impl SessionCookies {
    #[must_use]
    pub fn new(cookies: Value, expiration: DateTime<Utc>) -> Self {
        Self {
            cookies,
            expiration,
        }
    }

    /// True while `now` is still before the expiration.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expiration > now
    }
}

//! Key-value persistence port.
//!
//! The store is a plain string-to-string mapping. [`StateStore`] layers the
//! clinic-specific helpers on top of it: last-seen counts, last post times
//! and cached session cookies.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Clinic, SessionCookies};
use crate::error::{Result, StoreError};

/// Namespace for last-seen appointment counts.
pub const APPOINTMENT_NAMESPACE: &str = "slack-vaccine-appt";
/// Namespace for last post timestamps.
pub const POST_NAMESPACE: &str = "slack-vaccine-post";
/// Namespace for cached session cookies, keyed by site.
pub const COOKIES_NAMESPACE: &str = "vaccine-cookies";

/// Raw key-value storage.
///
/// Single-key operations must be atomic. There are no transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError>;
}

/// Clinic-aware helpers over a [`KeyValueStore`].
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<dyn KeyValueStore>,
}

impl StateStore {
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// `"<namespace>:<storage_key>"`
    #[must_use]
    pub fn with_prefix(namespace: &str, clinic: &dyn Clinic) -> String {
        format!("{namespace}:{}", clinic.storage_key())
    }

    /// Read a raw value.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.get(key).await?)
    }

    /// Write a raw value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.inner.set(key, value).await?)
    }

    /// Count persisted by the previous iteration; 0 when absent or unparseable.
    pub async fn get_count(&self, clinic: &dyn Clinic) -> Result<i64> {
        let key = Self::with_prefix(APPOINTMENT_NAMESPACE, clinic);
        let count = self
            .get(&key)
            .await?
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Ok(count)
    }

    /// Overwrite the persisted count with the clinic's current count.
    pub async fn save_count(&self, clinic: &dyn Clinic) -> Result<()> {
        let key = Self::with_prefix(APPOINTMENT_NAMESPACE, clinic);
        self.set(&key, &clinic.appointments().to_string()).await
    }

    /// Time of the last successful post for this clinic, if any.
    pub async fn get_post_time(&self, clinic: &dyn Clinic) -> Result<Option<DateTime<Utc>>> {
        let key = Self::with_prefix(POST_NAMESPACE, clinic);
        let Some(raw) = self.get(&key).await? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(time) => Ok(Some(time.with_timezone(&Utc))),
            Err(e) => {
                warn!(key = %key, value = %raw, error = %e, "Ignoring unparseable post time");
                Ok(None)
            }
        }
    }

    /// Record that the clinic was posted about at `now`.
    pub async fn save_post_time(&self, clinic: &dyn Clinic, now: DateTime<Utc>) -> Result<()> {
        let key = Self::with_prefix(POST_NAMESPACE, clinic);
        self.set(&key, &now.to_rfc3339()).await
    }

    /// Cached session for an external site. Expiry is left to the caller.
    pub async fn get_session(&self, site: &str) -> Result<Option<SessionCookies>> {
        let key = format!("{COOKIES_NAMESPACE}:{site}");
        let Some(raw) = self.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(site, error = %e, "Ignoring malformed cached session");
                Ok(None)
            }
        }
    }

    /// Cache session cookies for an external site.
    pub async fn save_session(
        &self,
        site: &str,
        cookies: Value,
        expiration: DateTime<Utc>,
    ) -> Result<()> {
        let key = format!("{COOKIES_NAMESPACE}:{site}");
        let encoded = serde_json::to_string(&SessionCookies::new(cookies, expiration))?;
        self.set(&key, &encoded).await
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::testkit::clinic::MockClinic;

    fn store() -> (Arc<MemoryStore>, StateStore) {
        let memory = Arc::new(MemoryStore::new());
        let state = StateStore::new(memory.clone());
        (memory, state)
    }

    #[test]
    fn prefixes_storage_key() {
        let clinic = MockClinic::new("example clinic", 7);
        assert_eq!(
            StateStore::with_prefix("my-prefix", &clinic),
            "my-prefix:example clinic"
        );
    }

    #[tokio::test]
    async fn count_defaults_to_zero() {
        let (_, state) = store();
        let clinic = MockClinic::new("example clinic", 7);
        assert_eq!(state.get_count(&clinic).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_round_trips_as_decimal_string() {
        let (memory, state) = store();
        let clinic = MockClinic::new("example clinic", 7);
        state.save_count(&clinic).await.unwrap();

        assert_eq!(
            memory.snapshot().get("slack-vaccine-appt:example clinic"),
            Some(&"7".to_string())
        );
        assert_eq!(state.get_count(&clinic).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn garbage_count_reads_as_zero() {
        let (_, state) = store();
        state
            .set("slack-vaccine-appt:example clinic", "lots")
            .await
            .unwrap();
        let clinic = MockClinic::new("example clinic", 7);
        assert_eq!(state.get_count(&clinic).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn saving_twice_is_idempotent() {
        let (_, state) = store();
        let clinic = MockClinic::new("example clinic", 12);
        state.save_count(&clinic).await.unwrap();
        state.save_count(&clinic).await.unwrap();
        assert_eq!(state.get_count(&clinic).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn post_time_round_trips() {
        let (_, state) = store();
        let clinic = MockClinic::new("example clinic", 7);
        let now = Utc.with_ymd_and_hms(2021, 2, 18, 9, 0, 0).unwrap();

        assert_eq!(state.get_post_time(&clinic).await.unwrap(), None);
        state.save_post_time(&clinic, now).await.unwrap();
        assert_eq!(state.get_post_time(&clinic).await.unwrap(), Some(now));
    }

    #[tokio::test]
    async fn unparseable_post_time_is_absent() {
        let (_, state) = store();
        state
            .set("slack-vaccine-post:example clinic", "yesterday")
            .await
            .unwrap();
        let clinic = MockClinic::new("example clinic", 7);
        assert_eq!(state.get_post_time(&clinic).await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_round_trips_as_json() {
        let (memory, state) = store();
        let expiration = Utc.with_ymd_and_hms(2021, 2, 18, 9, 0, 0).unwrap();
        state
            .save_session("ma-immunization", json!("foo"), expiration)
            .await
            .unwrap();

        let raw = memory
            .snapshot()
            .get("vaccine-cookies:ma-immunization")
            .cloned()
            .unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["cookies"], "foo");
        assert_eq!(parsed["expiration"], "2021-02-18T09:00:00Z");

        let session = state.get_session("ma-immunization").await.unwrap().unwrap();
        assert_eq!(session.cookies, json!("foo"));
        assert_eq!(session.expiration, expiration);
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let (_, state) = store();
        assert!(state.get_session("nowhere").await.unwrap().is_none());
    }
}

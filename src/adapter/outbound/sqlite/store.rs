//! SQLite key-value store implementation.
//!
//! Provides durable storage for counts, post times and sessions using
//! SQLite and Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::{
    create_pool, run_migrations, DbPool,
};
use crate::adapter::outbound::sqlite::database::model::KvEntryRow;
use crate::adapter::outbound::sqlite::database::schema::kv_entries;
use crate::error::{Result, StoreError};
use crate::port::KeyValueStore;

/// SQLite-backed key-value store.
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new store over an already migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open `database_url`, applying pending migrations.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or migrated.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn connection(
        &self,
    ) -> std::result::Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>,
        StoreError,
    > {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;

        let row: Option<KvEntryRow> = kv_entries::table
            .find(key)
            .select(KvEntryRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.map(|row| row.value))
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        let row = KvEntryRow {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self.connection()?;

        diesel::replace_into(kv_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = setup_store();
        assert_eq!(store.get("slack-vaccine-appt:nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = setup_store();
        store.set("slack-vaccine-appt:Fenway", "12").await.unwrap();
        assert_eq!(
            store.get("slack-vaccine-appt:Fenway").await.unwrap(),
            Some("12".to_string())
        );
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = setup_store();
        store.set("k", "1").await.unwrap();
        store.set("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = setup_store();
        store.set("slack-vaccine-appt:a", "1").await.unwrap();
        store.set("slack-vaccine-post:a", "x").await.unwrap();
        assert_eq!(
            store.get("slack-vaccine-appt:a").await.unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            store.get("slack-vaccine-post:a").await.unwrap(),
            Some("x".to_string())
        );
    }
}

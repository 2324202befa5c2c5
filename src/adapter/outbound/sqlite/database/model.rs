//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::kv_entries;

/// Database row for one key-value entry.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = kv_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntryRow {
    pub key: String,
    pub value: String,
    /// RFC3339 time of the last write.
    pub updated_at: String,
}

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};
use slotwatch::adapter::outbound::memory::MemoryStore;
use slotwatch::port::StateStore;

/// A fresh in-memory store and the state view over it.
pub fn memory_state() -> (Arc<MemoryStore>, StateStore) {
    let memory = Arc::new(MemoryStore::new());
    let state = StateStore::new(memory.clone());
    (memory, state)
}

/// Fixed decision time used across tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 2, 18, 9, 0, 0).unwrap()
}

/// Unique path under the system temp directory.
pub fn temp_path(name: &str, extension: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    path.push(format!("slotwatch-{name}-{nanos}.{extension}"));
    path
}

/// Write `contents` to a unique temp TOML file.
pub fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name, "toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

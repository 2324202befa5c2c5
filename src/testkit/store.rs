//! A key-value store that is always down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::port::KeyValueStore;

/// Fails every read and write with a connection error, counting attempts.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    calls: Arc<AtomicUsize>,
}

impl FailingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Connection("store unavailable".to_string())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.fail())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(self.fail())
    }
}

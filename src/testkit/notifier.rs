//! Notifiers that record or fail instead of delivering.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Observation;
use crate::error::ChannelError;
use crate::port::Notifier;

/// Records the storage keys of every batch it receives.
///
/// Clones share the same record, so a test can keep one handle and give
/// the other to the registry.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    name: &'static str,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            batches: Arc::default(),
            messages: Arc::default(),
        }
    }

    /// Storage keys per received batch, in order.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }

    /// Every text message rendered from the received batches.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.batches
            .lock()
            .push(batch.iter().map(|o| o.clinic.storage_key()).collect());
        self.messages.lock().extend(
            batch
                .iter()
                .flat_map(|o| o.clinic.notification_text().into_messages()),
        );
        Ok(())
    }
}

/// Fails every post, counting attempts.
#[derive(Debug, Clone)]
pub struct FailingNotifier {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FailingNotifier {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::default(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn post(&self, _batch: &[&Observation]) -> Result<(), ChannelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ChannelError::Rejected {
            channel: self.name,
            reason: "scripted failure".to_string(),
        })
    }
}

/// Fails the clinics whose storage key it was given and delivers the rest.
#[derive(Debug, Clone)]
pub struct PartialNotifier {
    name: &'static str,
    failing: Vec<String>,
}

impl PartialNotifier {
    #[must_use]
    pub fn new(name: &'static str, failing: &[&str]) -> Self {
        Self {
            name,
            failing: failing.iter().map(|key| (*key).to_string()).collect(),
        }
    }
}

#[async_trait]
impl Notifier for PartialNotifier {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        let (failed, delivered): (Vec<String>, Vec<String>) = batch
            .iter()
            .map(|o| o.clinic.storage_key())
            .partition(|key| self.failing.contains(key));
        if failed.is_empty() {
            return Ok(());
        }
        Err(ChannelError::Partial {
            channel: self.name,
            failed: failed.len(),
            total: batch.len(),
            delivered,
        })
    }
}

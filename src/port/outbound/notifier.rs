//! Notifier port for availability announcements.
//!
//! A notifier is one outbound channel (chat workspace, microblog account,
//! webhook). The orchestrator hands each notifier the clinics the policy
//! selected during an iteration; the notifier renders and delivers them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::Observation;
use crate::error::ChannelError;

/// Trait for notification channels.
///
/// # Implementation Notes
///
/// - An empty batch must be a silent no-op.
/// - A failure on one message should not stop the remaining messages;
///   report it through [`ChannelError::Partial`] once the batch is done.
/// - Implementations apply their own request timeouts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logs.
    fn name(&self) -> &'static str;

    /// Deliver announcements for every observation in `batch`.
    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError>;
}

/// Registry of notifiers (composite pattern).
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Registered notifiers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Notifier + 'static)> {
        self.notifiers.iter().map(AsRef::as_ref)
    }

    /// Names of registered notifiers.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn post(&self, _batch: &[&Observation]) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// Stand-in channel that writes announcements to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        for observation in batch {
            for text in observation.clinic.notification_text().into_messages() {
                info!(
                    clinic = %observation.clinic.title(),
                    new_appointments = observation.new_appointments(),
                    text = %text,
                    "Announcement"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_len_and_is_empty() {
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register(Box::new(NullNotifier));
        registry.register(Box::new(LogNotifier));
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["null", "log"]);
    }

    #[tokio::test]
    async fn stand_ins_accept_empty_batches() {
        assert!(NullNotifier.post(&[]).await.is_ok());
        assert!(LogNotifier.post(&[]).await.is_ok());
    }
}

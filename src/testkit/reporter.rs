//! Error reporter that keeps what it captured.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Error;
use crate::port::ErrorReporter;

/// Captured `(source, message)` pairs, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    captured: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }

    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        self.captured.lock().iter().map(|(s, _)| s.clone()).collect()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.captured.lock().iter().map(|(_, m)| m.clone()).collect()
    }
}

impl ErrorReporter for RecordingReporter {
    fn capture(&self, source: &str, error: &Error) {
        self.captured
            .lock()
            .push((source.to_string(), error.to_string()));
    }
}

//! Error-tracking port.
//!
//! Failures caught at an isolation boundary are logged where they happen
//! and additionally handed to an [`ErrorReporter`], the hook for an
//! error-tracking dashboard.

use tracing::error;

use crate::error::Error;

/// Receives errors that were isolated or are about to terminate the process.
pub trait ErrorReporter: Send + Sync {
    /// Record `error`, raised by the component named `source`.
    fn capture(&self, source: &str, error: &Error);
}

/// Drops every report. Used outside production-like environments.
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn capture(&self, _source: &str, _error: &Error) {}
}

/// Emits reports as error events on the `slotwatch::report` target.
pub struct TracingReporter {
    environment: String,
}

impl TracingReporter {
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
        }
    }
}

impl ErrorReporter for TracingReporter {
    fn capture(&self, source: &str, err: &Error) {
        error!(
            target: "slotwatch::report",
            environment = %self.environment,
            source,
            fatal = err.is_fatal(),
            error = %err,
            "Captured error"
        );
    }
}

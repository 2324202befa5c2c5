//! Error isolation around scraper and channel calls.

use std::future::Future;

use tracing::error;

use crate::error::Result;
use crate::port::ErrorReporter;

/// What a boundary does with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log, report and substitute the fallback value.
    Isolate,
    /// Hand the error back to the caller untouched.
    Propagate,
}

/// Run `operation`, applying `policy` if it fails.
///
/// Fatal errors (see [`crate::error::Error::is_fatal`]) always propagate,
/// whatever the policy says.
pub async fn catch_errors<T, F>(
    reporter: &dyn ErrorReporter,
    source: &str,
    policy: ErrorPolicy,
    on_error: T,
    operation: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match operation.await {
        Ok(value) => Ok(value),
        Err(err) if policy == ErrorPolicy::Isolate && !err.is_fatal() => {
            error!(source, error = %err, "Isolated failure");
            reporter.capture(source, &err);
            Ok(on_error)
        }
        Err(err) => Err(err),
    }
}

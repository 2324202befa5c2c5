//! Fixed-cadence pacing between iterations.

use std::time::Duration;

/// Time left to sleep so iterations start roughly every `interval`.
///
/// An iteration that overran its interval gets no sleep at all.
#[must_use]
pub fn remaining_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

//! Wall-clock measurement of benchmark phases.

use std::time::{Duration, Instant};

/// Runs `work` exactly once and measures its wall-clock duration with a monotonic clock.
///
/// Nothing but the two clock reads surrounds the work, so the measurement contains no overhead
/// beyond what `work` itself does.
#[inline]
pub fn bench<T>(work: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = work();
    let elapsed = start.elapsed();
    (result, elapsed)
}

/// Divides `amount` by the elapsed time in seconds.
///
/// Returns infinity for a zero duration, which only happens for empty work.
pub fn per_second(amount: f64, elapsed: Duration) -> f64 {
    amount / elapsed.as_secs_f64()
}

//! Wall-clock helpers.
//!
//! Due timestamps are UTC milliseconds since the Unix epoch, the same unit the
//! scheduler reads from its [`Clock`] when routing and measuring drift.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// UTC milliseconds since the Unix epoch.
pub type TimestampMs = u128;

/// Current UTC time in milliseconds since the Unix epoch.
///
/// A system clock set before 1970 reads as zero.
#[must_use]
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Delay from `now` until `due`, clamped to zero once `due` has passed.
#[must_use]
pub fn delay_until(due: TimestampMs, now: TimestampMs) -> Duration {
    let millis = due.saturating_sub(now);
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Source of "now" for admission routing and drift sampling.
pub trait Clock: Send + Sync + 'static {
    /// Current UTC time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> TimestampMs;
}

/// Clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        now_ms()
    }
}

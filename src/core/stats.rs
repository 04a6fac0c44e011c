//! Scheduler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of scheduler load and lifetime totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Configured admission limit.
    pub max_queue_size: usize,
    /// Future tasks waiting for their timer.
    pub timer_pending: usize,
    /// Due tasks waiting for an overdue worker.
    pub overdue_pending: usize,
    /// Tasks currently executing on either pool.
    pub running: u64,
    /// Tasks accepted by `add_event`.
    pub admitted: u64,
    /// Tasks refused with `LimitExceeded`.
    pub rejected: u64,
    /// Task bodies that returned `Ok`.
    pub completed: u64,
    /// Task bodies that returned `Err` or panicked.
    pub failed: u64,
}

impl SchedulerStats {
    /// Tasks admitted but not yet started.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.timer_pending + self.overdue_pending
    }
}

/// Internal counters for scheduler statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub running: AtomicU64,
    pub admitted: AtomicU64,
    pub rejected: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
}

impl SchedulerCounters {
    /// Snapshot the lifetime totals; pending counts are filled by the caller.
    pub fn snapshot(&self, max_queue_size: usize) -> SchedulerStats {
        SchedulerStats {
            max_queue_size,
            timer_pending: 0,
            overdue_pending: 0,
            running: self.running.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

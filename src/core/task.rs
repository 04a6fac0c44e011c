//! Admitted tasks, their ordering, and the shared execution path.

use std::cmp::Ordering;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::drift::DriftRecorder;
use crate::core::stats::SchedulerCounters;
use crate::core::SchedulerError;
use crate::util::clock::{Clock, TimestampMs};

/// Type-erased task body. Reports only success or failure; any typed result
/// has already been delivered by the closure itself.
pub(crate) type Job = Box<dyn FnOnce() -> Result<(), SchedulerError> + Send + 'static>;

/// A task that passed admission and owns its sequence id.
pub(crate) struct AdmittedTask {
    pub due: TimestampMs,
    pub sequence_id: u64,
    pub job: Job,
}

impl AdmittedTask {
    pub fn new(due: TimestampMs, sequence_id: u64, job: Job) -> Self {
        Self {
            due,
            sequence_id,
            job,
        }
    }

    /// Scheduling key: earlier due first, then earlier admission.
    pub const fn key(&self) -> (TimestampMs, u64) {
        (self.due, self.sequence_id)
    }
}

impl PartialEq for AdmittedTask {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for AdmittedTask {}

impl PartialOrd for AdmittedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AdmittedTask {
    /// Reversed so a max-heap `BinaryHeap` yields the smallest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Everything a worker needs to start a task: the clock for drift sampling,
/// the drift recorder, and the shared counters.
pub(crate) struct TaskRunner {
    clock: Arc<dyn Clock>,
    drift: Arc<DriftRecorder>,
    counters: Arc<SchedulerCounters>,
}

impl TaskRunner {
    pub fn new(
        clock: Arc<dyn Clock>,
        drift: Arc<DriftRecorder>,
        counters: Arc<SchedulerCounters>,
    ) -> Self {
        Self {
            clock,
            drift,
            counters,
        }
    }

    /// Sample drift, then run the body to completion on the calling thread.
    pub fn run(&self, task: AdmittedTask, worker: &str) {
        let started = self.clock.now_ms();
        self.drift.record(started.abs_diff(task.due));
        self.counters.running.fetch_add(1, AtomicOrdering::Relaxed);

        let sequence_id = task.sequence_id;
        debug!(worker, sequence_id, due = %task.due, started = %started, "Task started");

        match (task.job)() {
            Ok(()) => {
                self.counters.completed.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(worker, sequence_id, "Task completed");
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, AtomicOrdering::Relaxed);
                warn!(worker, sequence_id, error = %e, "Task failed");
            }
        }

        self.counters.running.fetch_sub(1, AtomicOrdering::Relaxed);
    }
}

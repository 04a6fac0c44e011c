//! Timer path: runs future-dated tasks once their delay elapses.
//!
//! All pending timers live in one deadline heap. Idle workers sleep on a
//! `Condvar` until the earliest deadline (or until an earlier timer is
//! scheduled), so waiting costs no thread per task and fired entries leave
//! the heap immediately.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::core::task::{AdmittedTask, TaskRunner};
use crate::core::worker::{join_workers, spawn_worker};
use crate::core::SchedulerError;

/// A task waiting for its deadline.
struct TimerEntry {
    deadline: Instant,
    task: AdmittedTask,
}

impl TimerEntry {
    const fn key(&self) -> (Instant, u64) {
        (self.deadline, self.task.sequence_id)
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline on top of the max-heap.
        other.key().cmp(&self.key())
    }
}

struct TimerState {
    heap: BinaryHeap<TimerEntry>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<TimerState>,
    changed: Condvar,
    pending: AtomicUsize,
}

impl Shared {
    /// Sleep until the earliest timer is due and take it; `None` once shut down.
    fn next_fired(&self) -> Option<AdmittedTask> {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return None;
            }
            let Some(deadline) = state.heap.peek().map(|entry| entry.deadline) else {
                self.changed.wait(&mut state);
                continue;
            };
            if deadline > Instant::now() {
                self.changed.wait_until(&mut state, deadline);
                continue;
            }
            if let Some(entry) = state.heap.pop() {
                self.pending.fetch_sub(1, AtomicOrdering::AcqRel);
                if !state.heap.is_empty() {
                    // Hand the next deadline to another idle worker.
                    self.changed.notify_one();
                }
                return Some(entry.task);
            }
        }
    }
}

/// Fixed pool of timer workers sharing one deadline heap.
pub(crate) struct TimerScheduler {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerScheduler {
    /// Spawn `worker_count` workers named `timer-worker-{n}`.
    pub fn start(
        worker_count: usize,
        stack_size: Option<usize>,
        runner: Arc<TaskRunner>,
    ) -> Result<Self, SchedulerError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(TimerState {
                heap: BinaryHeap::new(),
                shutdown: false,
            }),
            changed: Condvar::new(),
            pending: AtomicUsize::new(0),
        });

        let timer = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(worker_count)),
        };

        for worker_id in 0..worker_count {
            let name = format!("timer-worker-{worker_id}");
            let shared = Arc::clone(&timer.shared);
            let runner = Arc::clone(&runner);
            let thread_name = name.clone();
            let handle = spawn_worker(name, stack_size, move || {
                debug!(worker = %thread_name, "Timer worker started");
                while let Some(task) = shared.next_fired() {
                    runner.run(task, &thread_name);
                }
                debug!(worker = %thread_name, "Timer worker exiting");
            });
            match handle {
                Ok(handle) => timer.workers.lock().push(handle),
                Err(e) => {
                    timer.signal_shutdown();
                    return Err(e);
                }
            }
        }

        info!(worker_count, "Timer scheduler initialized");
        Ok(timer)
    }

    /// Fire the task built by `admit` once `delay` has elapsed from now.
    ///
    /// `admit` runs under the heap lock and only if the scheduler is still
    /// open. Returns the task's sequence id.
    pub fn schedule<F>(&self, admit: F, delay: Duration) -> Result<u64, SchedulerError>
    where
        F: FnOnce() -> AdmittedTask,
    {
        let deadline = Instant::now() + delay;
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return Err(SchedulerError::Shutdown);
        }
        let task = admit();
        let sequence_id = task.sequence_id;
        let becomes_head = state.heap.peek().is_none_or(|head| deadline < head.deadline);
        state.heap.push(TimerEntry { deadline, task });
        self.shared.pending.fetch_add(1, AtomicOrdering::AcqRel);
        drop(state);
        if becomes_head {
            self.shared.changed.notify_one();
        }
        Ok(sequence_id)
    }

    /// Timers scheduled but not yet fired.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(AtomicOrdering::Acquire)
    }

    /// Stop workers after their current task and drop unfired timers.
    pub fn signal_shutdown(&self) {
        let discarded = {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            let discarded = state.heap.len();
            state.heap.clear();
            self.shared.pending.store(0, AtomicOrdering::Release);
            discarded
        };
        self.shared.changed.notify_all();
        if discarded > 0 {
            info!(discarded, "Timer scheduler discarded pending timers");
        }
    }

    /// Signal shutdown and join the workers.
    pub fn shutdown(&self) {
        self.signal_shutdown();
        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        join_workers("timer", workers);
    }
}

//! Priority-ordered pool for tasks that are already due.
//!
//! A single `BinaryHeap` keyed by `(due, sequence_id)` is shared by every
//! worker, so a burst of overdue tasks drains earliest-due first no matter
//! which worker picks each one up.
//!
//! # Design
//!
//! - **No polling**: idle workers park on a `Condvar` until a push arrives
//! - **Global order**: one heap for the whole pool, not one per worker
//! - **Pending = queued**: a task stops counting the moment a worker pops it

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::core::task::{AdmittedTask, TaskRunner};
use crate::core::worker::{join_workers, spawn_worker};
use crate::core::SchedulerError;

struct QueueState {
    heap: BinaryHeap<AdmittedTask>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
    pending: AtomicUsize,
}

impl Shared {
    /// Block until a task is available; `None` once shut down.
    fn next_task(&self) -> Option<AdmittedTask> {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(task) = state.heap.pop() {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                return Some(task);
            }
            self.available.wait(&mut state);
        }
    }
}

/// Worker pool draining a shared `(due, sequence_id)` min-heap.
pub(crate) struct OverdueQueue {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl OverdueQueue {
    /// Spawn `worker_count` workers named `overdue-worker-{n}`.
    pub fn start(
        worker_count: usize,
        stack_size: Option<usize>,
        runner: Arc<TaskRunner>,
    ) -> Result<Self, SchedulerError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                heap: BinaryHeap::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
            pending: AtomicUsize::new(0),
        });

        let queue = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(worker_count)),
        };

        for worker_id in 0..worker_count {
            let name = format!("overdue-worker-{worker_id}");
            let shared = Arc::clone(&queue.shared);
            let runner = Arc::clone(&runner);
            let thread_name = name.clone();
            let handle = spawn_worker(name, stack_size, move || {
                debug!(worker = %thread_name, "Overdue worker started");
                while let Some(task) = shared.next_task() {
                    runner.run(task, &thread_name);
                }
                debug!(worker = %thread_name, "Overdue worker exiting");
            });
            match handle {
                Ok(handle) => queue.workers.lock().push(handle),
                Err(e) => {
                    queue.signal_shutdown();
                    return Err(e);
                }
            }
        }

        info!(worker_count, "Overdue queue initialized");
        Ok(queue)
    }

    /// Enqueue the task built by `admit` and wake one idle worker.
    ///
    /// `admit` runs under the queue lock and only if the queue is still open,
    /// so a rejected push never consumes a sequence id. Returns the task's
    /// sequence id.
    pub fn push<F>(&self, admit: F) -> Result<u64, SchedulerError>
    where
        F: FnOnce() -> AdmittedTask,
    {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return Err(SchedulerError::Shutdown);
        }
        let task = admit();
        let sequence_id = task.sequence_id;
        state.heap.push(task);
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        drop(state);
        self.shared.available.notify_one();
        Ok(sequence_id)
    }

    /// Tasks enqueued but not yet started.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Stop workers after their current task and discard queued tasks.
    pub fn signal_shutdown(&self) {
        let discarded = {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            let discarded = state.heap.len();
            state.heap.clear();
            self.shared.pending.store(0, Ordering::Release);
            discarded
        };
        self.shared.available.notify_all();
        if discarded > 0 {
            info!(discarded, "Overdue queue discarded pending tasks");
        }
    }

    /// Signal shutdown and join the workers.
    pub fn shutdown(&self) {
        self.signal_shutdown();
        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        join_workers("overdue", workers);
    }
}

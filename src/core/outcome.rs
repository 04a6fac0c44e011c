//! Optional per-task result delivery.
//!
//! By default the scheduler is fire-and-forget: a task's result or failure is
//! logged and counted, nothing more. Callers that need the value admit the
//! event through `Scheduler::add_event_with_outcome` and get an
//! [`OutcomeHandle`] back.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::core::event::TaskFn;
use crate::core::SchedulerError;

/// Result of one task body.
pub type TaskOutcome<R> = Result<R, SchedulerError>;

/// Receiving end for a single task's outcome.
#[derive(Debug)]
pub struct OutcomeHandle<R> {
    rx: Receiver<TaskOutcome<R>>,
}

impl<R> OutcomeHandle<R> {
    pub(crate) const fn new(rx: Receiver<TaskOutcome<R>>) -> Self {
        Self { rx }
    }

    /// Block until the task finishes or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::TaskFailed` / `TaskPanicked` if the body failed
    /// - `SchedulerError::Timeout` if no outcome arrived in time
    /// - `SchedulerError::Shutdown` if the task was discarded before running
    pub fn wait(self, timeout: Duration) -> TaskOutcome<R> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(SchedulerError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(SchedulerError::Shutdown),
        }
    }

    /// Take the outcome if the task already finished.
    ///
    /// Returns `None` while the task is still pending or running.
    pub fn try_take(&self) -> Option<TaskOutcome<R>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SchedulerError::Shutdown)),
        }
    }
}

/// Run a task body, turning `Err` and panics into `SchedulerError`s so a
/// failing body never takes its worker thread down.
pub(crate) fn run_body<R>(body: TaskFn<R>) -> TaskOutcome<R> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(SchedulerError::TaskFailed(format!("{e:#}"))),
        Err(payload) => Err(SchedulerError::TaskPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

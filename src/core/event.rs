//! Caller-facing unit of deferred work.

use std::fmt;

use crate::util::clock::TimestampMs;

/// Boxed task body: runs once and produces a result or fails.
pub type TaskFn<R> = Box<dyn FnOnce() -> anyhow::Result<R> + Send + 'static>;

/// A task paired with the earliest instant it may run.
///
/// `due` is UTC milliseconds since the Unix epoch. Events carry no identity;
/// two events with the same `due` are still distinct units of work.
///
/// ```
/// use due_scheduler::core::Event;
/// use due_scheduler::util::now_ms;
///
/// let event = Event::new(now_ms() + 250, || Ok(42));
/// assert!(event.due() > 0);
/// ```
pub struct Event<R> {
    due: TimestampMs,
    task: TaskFn<R>,
}

impl<R> Event<R> {
    /// Create an event due at `due`.
    pub fn new<F>(due: TimestampMs, task: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<R> + Send + 'static,
    {
        Self {
            due,
            task: Box::new(task),
        }
    }

    /// Due timestamp in UTC milliseconds.
    #[must_use]
    pub const fn due(&self) -> TimestampMs {
        self.due
    }

    pub(crate) fn into_parts(self) -> (TimestampMs, TaskFn<R>) {
        (self.due, self.task)
    }
}

impl<R> fmt::Debug for Event<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("due", &self.due).finish_non_exhaustive()
    }
}

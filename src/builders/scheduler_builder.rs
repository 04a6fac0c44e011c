//! Builder assembling a [`Scheduler`] from configuration and collaborators.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{DriftSink, Scheduler, SchedulerError};
use crate::infra::sink::TracingDriftSink;
use crate::util::clock::{Clock, SystemClock};

/// Collects configuration, clock and drift sink, then starts the scheduler.
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new()
///     .config(SchedulerConfig::from_env()?)
///     .sink(Arc::new(InMemoryDriftSink::new(64)))
///     .build()?;
/// ```
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn DriftSink>>,
}

impl SchedulerBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set `max_queue_size`.
    #[must_use]
    pub fn max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.config.max_queue_size = max_queue_size;
        self
    }

    /// Set the timer-path worker count.
    #[must_use]
    pub fn max_threads(mut self, max_threads: usize) -> Self {
        self.config.max_threads = max_threads;
        self
    }

    /// Set the overdue-path worker count.
    #[must_use]
    pub fn late_max_threads(mut self, late_max_threads: usize) -> Self {
        self.config.late_max_threads = late_max_threads;
        self
    }

    /// Use a custom clock instead of [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom drift sink instead of [`TracingDriftSink`].
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn DriftSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration and start the scheduler.
    ///
    /// # Errors
    ///
    /// See [`Scheduler::new`].
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingDriftSink));
        Scheduler::with_parts(self.config, clock, sink)
    }
}

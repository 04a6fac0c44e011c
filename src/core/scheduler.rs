//! Admission gate: the public entry point of the scheduler.
//!
//! `add_event` checks capacity across both execution paths, stamps the task
//! with a sequence number, and routes it:
//!
//! - `due <= now` goes straight to the overdue queue
//! - `due > now` goes to the timer scheduler with `delay = due - now`
//!
//! The capacity check reads the two pending counters and then inserts; it is
//! not atomic across paths, so concurrent callers racing at the limit may
//! briefly overshoot `max_queue_size` by the number of racers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::bounded;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::core::drift::{DriftRecorder, DriftReporter, DriftSink};
use crate::core::event::Event;
use crate::core::outcome::{run_body, OutcomeHandle};
use crate::core::overdue_queue::OverdueQueue;
use crate::core::sequence::SequenceCounter;
use crate::core::stats::{SchedulerCounters, SchedulerStats};
use crate::core::task::{AdmittedTask, Job, TaskRunner};
use crate::core::timer::TimerScheduler;
use crate::core::SchedulerError;
use crate::infra::sink::TracingDriftSink;
use crate::util::clock::{delay_until, Clock, SystemClock, TimestampMs};

/// Bounded-capacity, due-time ordered task scheduler.
///
/// ```rust,ignore
/// use due_scheduler::core::{Event, Scheduler};
/// use due_scheduler::util::now_ms;
///
/// let scheduler = Scheduler::new(1024, 16, 1)?;
/// scheduler.add_event(Event::new(now_ms() + 500, || {
///     send_reminder()?;
///     Ok(())
/// }))?;
/// ```
pub struct Scheduler {
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    sequence: SequenceCounter,
    counters: Arc<SchedulerCounters>,
    drift: Arc<DriftRecorder>,
    timer: TimerScheduler,
    overdue: OverdueQueue,
    reporter: DriftReporter,
    shutdown: AtomicBool,
}

impl Scheduler {
    /// Create a scheduler with the given limits, the system clock and the
    /// tracing drift sink.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if any size is zero
    /// - `SchedulerError::Spawn` if a worker thread cannot be started
    pub fn new(
        max_queue_size: usize,
        max_threads: usize,
        late_max_threads: usize,
    ) -> Result<Self, SchedulerError> {
        Self::from_config(
            SchedulerConfig::new()
                .with_max_queue_size(max_queue_size)
                .with_max_threads(max_threads)
                .with_late_max_threads(late_max_threads),
        )
    }

    /// Create a scheduler from configuration with the system clock and the
    /// tracing drift sink.
    ///
    /// # Errors
    ///
    /// See [`Scheduler::new`].
    pub fn from_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(TracingDriftSink))
    }

    /// Create a scheduler with an explicit clock and drift sink.
    ///
    /// # Errors
    ///
    /// See [`Scheduler::new`].
    pub fn with_parts(
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DriftSink>,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        let counters = Arc::new(SchedulerCounters::default());
        let drift = Arc::new(DriftRecorder::new(config.drift_label.clone(), sink)?);
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&clock),
            Arc::clone(&drift),
            Arc::clone(&counters),
        ));

        let timer = TimerScheduler::start(
            config.max_threads,
            config.thread_stack_size,
            Arc::clone(&runner),
        )?;
        let overdue = match OverdueQueue::start(
            config.late_max_threads,
            config.thread_stack_size,
            runner,
        ) {
            Ok(overdue) => overdue,
            Err(e) => {
                timer.signal_shutdown();
                return Err(e);
            }
        };
        let reporter = match DriftReporter::start(Arc::clone(&drift), config.report_interval()) {
            Ok(reporter) => reporter,
            Err(e) => {
                timer.signal_shutdown();
                overdue.signal_shutdown();
                return Err(e);
            }
        };

        info!(
            max_queue_size = config.max_queue_size,
            max_threads = config.max_threads,
            late_max_threads = config.late_max_threads,
            report_interval_secs = config.report_interval_secs,
            "Scheduler initialized"
        );

        Ok(Self {
            config,
            clock,
            sequence: SequenceCounter::new(),
            counters,
            drift,
            timer,
            overdue,
            reporter,
            shutdown: AtomicBool::new(false),
        })
    }

    /// Admit an event for execution at or after its due time.
    ///
    /// The task's result is discarded; failures are logged and counted.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::LimitExceeded` if `max_queue_size` tasks are pending;
    ///   nothing was admitted
    /// - `SchedulerError::Shutdown` after [`Scheduler::shutdown`]
    pub fn add_event<R>(&self, event: Event<R>) -> Result<(), SchedulerError>
    where
        R: Send + 'static,
    {
        let (due, body) = event.into_parts();
        self.admit(due, Box::new(move || run_body(body).map(drop)))
    }

    /// Admit an event and get a handle to its result.
    ///
    /// Admission rules are identical to [`Scheduler::add_event`].
    ///
    /// # Errors
    ///
    /// See [`Scheduler::add_event`].
    pub fn add_event_with_outcome<R>(&self, event: Event<R>) -> Result<OutcomeHandle<R>, SchedulerError>
    where
        R: Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let (due, body) = event.into_parts();
        self.admit(
            due,
            Box::new(move || {
                let outcome = run_body(body);
                let status = outcome.as_ref().map(drop).map_err(Clone::clone);
                // The caller may have dropped the handle.
                let _ = tx.send(outcome);
                status
            }),
        )?;
        Ok(OutcomeHandle::new(rx))
    }

    fn admit(&self, due: TimestampMs, job: Job) -> Result<(), SchedulerError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(SchedulerError::Shutdown);
        }

        let pending = self.pending();
        if pending >= self.config.max_queue_size {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(pending, limit = self.config.max_queue_size, "Event rejected: limit exceeded");
            return Err(SchedulerError::LimitExceeded {
                pending,
                limit: self.config.max_queue_size,
            });
        }

        // The sequence id is taken under the path's lock, after it has
        // confirmed it is still open.
        let now = self.clock.now_ms();
        if due <= now {
            let sequence_id = self
                .overdue
                .push(|| AdmittedTask::new(due, self.sequence.next_id(), job))?;
            debug!(sequence_id, overdue_ms = %(now - due), "Event admitted to overdue queue");
        } else {
            let delay = delay_until(due, now);
            let sequence_id = self
                .timer
                .schedule(|| AdmittedTask::new(due, self.sequence.next_id(), job), delay)?;
            debug!(sequence_id, delay_ms = delay.as_millis(), "Event admitted to timer");
        }

        self.counters.admitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Tasks admitted but not yet started, across both paths.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timer.pending() + self.overdue.pending()
    }

    /// Sequence ids handed out so far (one per successful admission).
    #[must_use]
    pub fn sequence_ids_issued(&self) -> u64 {
        self.sequence.issued()
    }

    /// Current pool occupancy and lifetime totals.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let mut stats = self.counters.snapshot(self.config.max_queue_size);
        stats.timer_pending = self.timer.pending();
        stats.overdue_pending = self.overdue.pending();
        stats
    }

    /// Drift recorder shared by both worker pools.
    #[must_use]
    pub fn drift(&self) -> &DriftRecorder {
        &self.drift
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Stop accepting events, discard pending tasks, join workers (bounded
    /// per pool) and publish a final drift summary.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        info!(pending = self.pending(), "Shutting down scheduler");
        self.timer.shutdown();
        self.overdue.shutdown();
        self.reporter.stop();
        info!("Scheduler shut down complete");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Signal only; workers stuck in long task bodies must not block drop.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            self.timer.signal_shutdown();
            self.overdue.signal_shutdown();
            self.reporter.signal_stop();
            debug!("Scheduler dropped without explicit shutdown - workers will be detached");
        }
    }
}

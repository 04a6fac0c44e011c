//! # Due Scheduler
//!
//! A bounded-capacity, time-ordered task scheduler.
//!
//! Callers submit a task together with a "due" timestamp; the scheduler runs
//! the task at or after that instant. A hard capacity limit fails fast with
//! `LimitExceeded` instead of queuing without bound, so fanning out many
//! deferred jobs (notifications, retries, timed callbacks) never grows memory
//! or latency without limit under overload.
//!
//! ## Execution Paths
//!
//! - **Timer path**: tasks due in the future wait on a shared deadline heap
//!   and fire on a dedicated pool of `max_threads` workers
//! - **Overdue path**: tasks already due at admission go to a priority queue
//!   ordered by `(due, sequence_id)` and drained by `late_max_threads` workers
//!
//! Tasks with identical due timestamps run in admission order. Every task
//! samples its start-time drift into an HDR histogram that is reported every
//! 10 seconds through a pluggable [`core::DriftSink`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use due_scheduler::core::{Event, Scheduler, SchedulerError};
//! use due_scheduler::util::now_ms;
//!
//! let scheduler = Scheduler::new(1024, 16, 1)?;
//!
//! match scheduler.add_event(Event::new(now_ms() + 1_000, || {
//!     notify_user()?;
//!     Ok(())
//! })) {
//!     Ok(()) => {}
//!     Err(SchedulerError::LimitExceeded { .. }) => back_off(),
//!     Err(e) => return Err(e.into()),
//! }
//!
//! // Opt in to the task's result:
//! let handle = scheduler.add_event_with_outcome(Event::new(now_ms(), || Ok(42)))?;
//! assert_eq!(handle.wait(Duration::from_secs(1))?, 42);
//! ```
//!
//! For complete examples, see:
//! - `tests/ordering_test.rs` - Ordering guarantees across both paths
//! - `tests/admission_test.rs` - Capacity limits and rejection behavior

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: admission gate, timer and overdue pools, drift recording.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Builders to construct a scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for drift reporting sinks.
pub mod infra;
/// Shared utilities.
pub mod util;

pub use crate::builders::SchedulerBuilder;
pub use crate::config::SchedulerConfig;
pub use crate::core::{Event, OutcomeHandle, Scheduler, SchedulerError, SchedulerStats};

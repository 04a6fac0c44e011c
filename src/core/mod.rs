//! Core scheduling abstractions and capacity accounting.

pub mod drift;
pub mod error;
pub mod event;
pub mod outcome;
pub mod scheduler;
pub mod sequence;
pub mod stats;

mod overdue_queue;
mod task;
mod timer;
mod worker;

pub use drift::{DriftRecorder, DriftSink, DriftSummary, MAX_RECORDED_DRIFT_MS};
pub use error::{AppResult, SchedulerError};
pub use event::{Event, TaskFn};
pub use outcome::{OutcomeHandle, TaskOutcome};
pub use scheduler::Scheduler;
pub use sequence::SequenceCounter;
pub use stats::SchedulerStats;

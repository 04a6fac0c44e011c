//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Admitting one more task would exceed the configured queue size.
    #[error("limit exceeded: {pending} pending tasks, limit {limit}")]
    LimitExceeded {
        /// Pending tasks observed at admission time.
        pending: usize,
        /// Configured `max_queue_size`.
        limit: usize,
    },
    /// The scheduler has been shut down.
    #[error("scheduler has been shut down")]
    Shutdown,
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A worker or reporter thread could not be spawned.
    #[error("failed to spawn thread: {0}")]
    Spawn(String),
    /// The task body returned an error.
    #[error("task failed: {0}")]
    TaskFailed(String),
    /// The task body panicked.
    #[error("task panicked: {0}")]
    TaskPanicked(String),
    /// Waiting for a task outcome timed out.
    #[error("operation timed out")]
    Timeout,
}

impl SchedulerError {
    /// True for admission-time capacity rejections.
    #[must_use]
    pub const fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

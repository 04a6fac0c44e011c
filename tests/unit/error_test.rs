//! Tests for error types

use due_scheduler::core::SchedulerError;

#[test]
fn test_limit_exceeded_error() {
    let err = SchedulerError::LimitExceeded { pending: 10, limit: 10 };
    assert_eq!(format!("{}", err), "limit exceeded: 10 pending tasks, limit 10");
    assert!(err.is_limit_exceeded());
}

#[test]
fn test_shutdown_error() {
    let err = SchedulerError::Shutdown;
    assert_eq!(format!("{}", err), "scheduler has been shut down");
    assert!(!err.is_limit_exceeded());
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_threads must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_threads must be greater than 0"
    );
}

#[test]
fn test_task_errors() {
    let err = SchedulerError::TaskFailed("connection refused".to_string());
    assert_eq!(format!("{}", err), "task failed: connection refused");

    let err = SchedulerError::TaskPanicked("index out of bounds".to_string());
    assert_eq!(format!("{}", err), "task panicked: index out of bounds");

    let err = SchedulerError::Timeout;
    assert_eq!(format!("{}", err), "operation timed out");
}

//! Tests for configuration validation

use due_scheduler::config::SchedulerConfig;
use std::time::Duration;

#[test]
fn test_default_config_is_valid() {
    let config = SchedulerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.max_queue_size, 1024);
    assert_eq!(config.late_max_threads, 1);
    assert_eq!(config.report_interval(), Duration::from_secs(10));
    assert_eq!(config.drift_label, "drifts");
    assert!(config.max_threads >= 1);
}

#[test]
fn test_builder_setters() {
    let config = SchedulerConfig::new()
        .with_max_queue_size(60_000)
        .with_max_threads(4)
        .with_late_max_threads(2)
        .with_report_interval_secs(5)
        .with_drift_label("push.drift")
        .with_thread_stack_size(512 * 1024);

    assert_eq!(config.max_queue_size, 60_000);
    assert_eq!(config.max_threads, 4);
    assert_eq!(config.late_max_threads, 2);
    assert_eq!(config.report_interval_secs, 5);
    assert_eq!(config.drift_label, "push.drift");
    assert_eq!(config.thread_stack_size, Some(512 * 1024));
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_values_invalid() {
    assert!(SchedulerConfig::new().with_max_queue_size(0).validate().is_err());
    assert!(SchedulerConfig::new().with_max_threads(0).validate().is_err());
    assert!(SchedulerConfig::new().with_late_max_threads(0).validate().is_err());
    assert!(SchedulerConfig::new().with_report_interval_secs(0).validate().is_err());
    assert!(SchedulerConfig::new().with_thread_stack_size(0).validate().is_err());
    assert!(SchedulerConfig::new().with_drift_label("  ").validate().is_err());
}

#[test]
fn test_from_json_full() {
    let json = r#"{
        "max_queue_size": 1024,
        "max_threads": 16,
        "late_max_threads": 1,
        "report_interval_secs": 10,
        "drift_label": "drifts",
        "thread_stack_size": null
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_threads, 16);
    assert_eq!(config.thread_stack_size, None);
}

#[test]
fn test_from_json_partial_uses_defaults() {
    let config = SchedulerConfig::from_json_str(r#"{ "max_queue_size": 10 }"#).unwrap();
    assert_eq!(config.max_queue_size, 10);
    assert_eq!(config.late_max_threads, 1);
    assert_eq!(config.report_interval_secs, 10);
}

#[test]
fn test_from_json_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{ "max_queue_size": 0 }"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_vars() {
    let vars = [
        ("DUE_SCHEDULER_MAX_QUEUE_SIZE", "256"),
        ("DUE_SCHEDULER_MAX_THREADS", " 8 "),
        ("DUE_SCHEDULER_LATE_MAX_THREADS", "2"),
        ("DUE_SCHEDULER_REPORT_INTERVAL_SECS", "30"),
        ("DUE_SCHEDULER_DRIFT_LABEL", "jobs.drift"),
        ("PATH", "/usr/bin"),
    ];

    let config = SchedulerConfig::from_vars(vars).unwrap();
    assert_eq!(config.max_queue_size, 256);
    assert_eq!(config.max_threads, 8);
    assert_eq!(config.late_max_threads, 2);
    assert_eq!(config.report_interval_secs, 30);
    assert_eq!(config.drift_label, "jobs.drift");
}

#[test]
fn test_from_vars_bad_number() {
    let err = SchedulerConfig::from_vars([("DUE_SCHEDULER_MAX_THREADS", "many")]).unwrap_err();
    assert!(err.contains("DUE_SCHEDULER_MAX_THREADS"), "{err}");
}

#[test]
fn test_from_vars_validates() {
    assert!(SchedulerConfig::from_vars([("DUE_SCHEDULER_LATE_MAX_THREADS", "0")]).is_err());
}

#[test]
fn test_json_roundtrip_matches() {
    let config = SchedulerConfig::new().with_max_threads(3);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(SchedulerConfig::from_json_str(&json).unwrap(), config);
}

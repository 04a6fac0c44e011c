//! Tests for builders

use due_scheduler::builders::SchedulerBuilder;
use due_scheduler::config::SchedulerConfig;
use due_scheduler::core::{Event, SchedulerError};
use due_scheduler::infra::InMemoryDriftSink;
use due_scheduler::util::Clock;
use std::sync::Arc;
use std::time::Duration;

struct FixedClock(u128);

impl Clock for FixedClock {
    fn now_ms(&self) -> u128 {
        self.0
    }
}

#[test]
fn test_build_with_overrides() {
    let scheduler = SchedulerBuilder::new()
        .config(SchedulerConfig::new().with_drift_label("custom"))
        .max_queue_size(8)
        .max_threads(1)
        .late_max_threads(1)
        .sink(Arc::new(InMemoryDriftSink::new(4)))
        .build()
        .unwrap();

    assert_eq!(scheduler.config().max_queue_size, 8);
    assert_eq!(scheduler.config().drift_label, "custom");
    scheduler.shutdown();
}

#[test]
fn test_build_invalid_config() {
    let result = SchedulerBuilder::new().max_queue_size(0).build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_custom_clock_decides_routing() {
    // A clock far in the future makes every event overdue.
    let scheduler = SchedulerBuilder::new()
        .max_threads(1)
        .late_max_threads(1)
        .clock(Arc::new(FixedClock(u128::from(u64::MAX))))
        .build()
        .unwrap();

    let handle = scheduler
        .add_event_with_outcome(Event::new(due_scheduler::util::now_ms() + 60_000, || Ok(5)))
        .unwrap();
    assert_eq!(handle.wait(Duration::from_secs(10)), Ok(5));
    assert_eq!(scheduler.stats().timer_pending, 0);
    scheduler.shutdown();
}

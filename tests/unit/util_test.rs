//! Tests for utility functions

use due_scheduler::util::{delay_until, now_ms, Clock, SystemClock};
use std::time::Duration;

#[test]
fn test_now_ms_matches_system_clock() {
    let a = now_ms();
    let b = SystemClock.now_ms();
    assert!(b >= a);
    assert!(b - a < 1_000);
}

#[test]
fn test_delay_until() {
    assert_eq!(delay_until(2_000, 1_000), Duration::from_secs(1));
    assert_eq!(delay_until(1_000, 2_000), Duration::ZERO);
}

#[test]
fn test_delay_until_saturates() {
    assert_eq!(delay_until(u128::MAX, 0), Duration::from_millis(u64::MAX));
}

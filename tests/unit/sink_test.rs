//! Tests for drift sinks

use due_scheduler::core::{DriftSink, DriftSummary};
use due_scheduler::infra::{InMemoryDriftSink, TracingDriftSink};

fn summary(label: &str, count: u64) -> DriftSummary {
    DriftSummary {
        label: label.to_string(),
        count,
        min_ms: 1,
        max_ms: 9,
        mean_ms: 4.0,
        stddev_ms: 2.0,
        p50_ms: 4,
        p75_ms: 6,
        p95_ms: 8,
        p98_ms: 9,
        p99_ms: 9,
        p999_ms: 9,
    }
}

#[test]
fn test_in_memory_sink() {
    let sink = InMemoryDriftSink::new(10);
    sink.publish(summary("drifts", 3));
    sink.publish(summary("drifts", 4));

    let summaries = sink.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].count, 3);
    assert_eq!(sink.total_count(), 7);
}

#[test]
fn test_in_memory_sink_overflow() {
    let sink = InMemoryDriftSink::new(2);
    sink.publish(summary("a", 1));
    sink.publish(summary("b", 1));
    sink.publish(summary("c", 1));

    let summaries = sink.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].label, "b"); // First one popped
    assert_eq!(summaries[1].label, "c");
}

#[test]
fn test_tracing_sink_accepts_summary() {
    due_scheduler::util::init_tracing();
    TracingDriftSink.publish(summary("drifts", 1));
}

#[test]
fn test_summary_serializes() {
    let json = serde_json::to_value(summary("drifts", 2)).unwrap();
    assert_eq!(json["label"], "drifts");
    assert_eq!(json["count"], 2);
    assert_eq!(json["p99_ms"], 9);
}

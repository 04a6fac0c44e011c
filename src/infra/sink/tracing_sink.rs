//! Drift sink that logs each summary through `tracing`.

use tracing::info;

use crate::core::{DriftSink, DriftSummary};

/// Default sink: one structured `info` event per report interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDriftSink;

impl DriftSink for TracingDriftSink {
    fn publish(&self, summary: DriftSummary) {
        info!(
            target: "due_scheduler::drift",
            label = %summary.label,
            count = summary.count,
            min_ms = summary.min_ms,
            max_ms = summary.max_ms,
            mean_ms = summary.mean_ms,
            stddev_ms = summary.stddev_ms,
            p50_ms = summary.p50_ms,
            p75_ms = summary.p75_ms,
            p95_ms = summary.p95_ms,
            p98_ms = summary.p98_ms,
            p99_ms = summary.p99_ms,
            p999_ms = summary.p999_ms,
            "drift histogram"
        );
    }
}

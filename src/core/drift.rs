//! Start-time drift instrumentation.
//!
//! Every task samples `|actual_start - due|` (milliseconds) the moment a worker
//! picks it up. Samples accumulate in an HDR histogram which a background
//! reporter drains into a [`DriftSink`] on a fixed cadence. Nothing here feeds
//! back into scheduling.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::SchedulerError;

/// Significant figures kept by the drift histogram.
const SIGNIFICANT_FIGURES: u8 = 3;

/// Largest drift the histogram resolves; larger samples are clamped to it.
pub const MAX_RECORDED_DRIFT_MS: u64 = 365 * 24 * 60 * 60 * 1_000;

/// Histogram summary published once per report interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Metric label, `drifts` by default.
    pub label: String,
    /// Samples in this interval.
    pub count: u64,
    /// Smallest drift (ms).
    pub min_ms: u64,
    /// Largest drift (ms).
    pub max_ms: u64,
    /// Mean drift (ms).
    pub mean_ms: f64,
    /// Standard deviation (ms).
    pub stddev_ms: f64,
    /// Median (ms).
    pub p50_ms: u64,
    /// 75th percentile (ms).
    pub p75_ms: u64,
    /// 95th percentile (ms).
    pub p95_ms: u64,
    /// 98th percentile (ms).
    pub p98_ms: u64,
    /// 99th percentile (ms).
    pub p99_ms: u64,
    /// 99.9th percentile (ms).
    pub p999_ms: u64,
}

impl DriftSummary {
    fn from_histogram(label: &str, hist: &Histogram<u64>) -> Self {
        Self {
            label: label.to_string(),
            count: hist.len(),
            min_ms: hist.min(),
            max_ms: hist.max(),
            mean_ms: hist.mean(),
            stddev_ms: hist.stdev(),
            p50_ms: hist.value_at_quantile(0.50),
            p75_ms: hist.value_at_quantile(0.75),
            p95_ms: hist.value_at_quantile(0.95),
            p98_ms: hist.value_at_quantile(0.98),
            p99_ms: hist.value_at_quantile(0.99),
            p999_ms: hist.value_at_quantile(0.999),
        }
    }

    /// Summary of an interval without samples.
    #[must_use]
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: 0,
            min_ms: 0,
            max_ms: 0,
            mean_ms: 0.0,
            stddev_ms: 0.0,
            p50_ms: 0,
            p75_ms: 0,
            p95_ms: 0,
            p98_ms: 0,
            p99_ms: 0,
            p999_ms: 0,
        }
    }
}

/// Destination for periodic drift summaries (log, metrics backend, ...).
///
/// Publishing is fire-and-forget; a slow sink only delays the reporter thread.
pub trait DriftSink: Send + Sync {
    /// Receive one interval's summary.
    fn publish(&self, summary: DriftSummary);
}

/// Collects drift samples and drains them into a sink.
pub struct DriftRecorder {
    label: String,
    histogram: Mutex<Histogram<u64>>,
    sink: Arc<dyn DriftSink>,
}

impl DriftRecorder {
    /// Create a recorder publishing under `label`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` if the histogram cannot be built.
    pub fn new(label: impl Into<String>, sink: Arc<dyn DriftSink>) -> Result<Self, SchedulerError> {
        let histogram = Histogram::<u64>::new_with_bounds(1, MAX_RECORDED_DRIFT_MS, SIGNIFICANT_FIGURES)
            .map_err(|e| SchedulerError::InvalidConfig(format!("drift histogram: {e}")))?;
        Ok(Self {
            label: label.into(),
            histogram: Mutex::new(histogram),
            sink,
        })
    }

    /// Record one drift sample in milliseconds, clamped to
    /// [`MAX_RECORDED_DRIFT_MS`].
    pub fn record(&self, drift_ms: u128) {
        let value = u64::try_from(drift_ms).unwrap_or(u64::MAX);
        self.histogram.lock().saturating_record(value);
    }

    /// Samples recorded since the last flush.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.histogram.lock().len()
    }

    /// Summary of the current interval without draining it.
    #[must_use]
    pub fn snapshot(&self) -> Option<DriftSummary> {
        let hist = self.histogram.lock();
        if hist.is_empty() {
            return None;
        }
        Some(DriftSummary::from_histogram(&self.label, &hist))
    }

    /// Drain the current interval into the sink.
    ///
    /// Returns the published summary, or `None` (publishing nothing) if there
    /// were no samples.
    pub fn flush(&self) -> Option<DriftSummary> {
        let summary = self.drain()?;
        self.sink.publish(summary.clone());
        Some(summary)
    }

    /// Drain the current interval into the sink, publishing a zero-count
    /// summary when there were no samples.
    pub fn report(&self) -> DriftSummary {
        let summary = self
            .drain()
            .unwrap_or_else(|| DriftSummary::empty(self.label.as_str()));
        self.sink.publish(summary.clone());
        summary
    }

    fn drain(&self) -> Option<DriftSummary> {
        let mut hist = self.histogram.lock();
        if hist.is_empty() {
            return None;
        }
        let summary = DriftSummary::from_histogram(&self.label, &hist);
        hist.reset();
        Some(summary)
    }
}

/// Background thread reporting a [`DriftRecorder`] every `interval`.
///
/// Every tick publishes, idle intervals included. Dropping the stop sender
/// wakes the thread, which reports once more and exits.
pub(crate) struct DriftReporter {
    stop_tx: Mutex<Option<Sender<()>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DriftReporter {
    pub fn start(recorder: Arc<DriftRecorder>, interval: Duration) -> Result<Self, SchedulerError> {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("drift-reporter".into())
            .spawn(move || {
                debug!(interval_ms = interval.as_millis(), "Drift reporter started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            recorder.report();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            recorder.report();
                            break;
                        }
                    }
                }
                debug!("Drift reporter exiting");
            })
            .map_err(|e| SchedulerError::Spawn(e.to_string()))?;

        Ok(Self {
            stop_tx: Mutex::new(Some(stop_tx)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Wake the reporter for its final flush without waiting for it.
    pub fn signal_stop(&self) {
        self.stop_tx.lock().take();
    }

    /// Stop the reporter and wait for its final flush.
    pub fn stop(&self) {
        self.signal_stop();
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                warn!("Drift reporter panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::sink::InMemoryDriftSink;

    fn recorder() -> (Arc<InMemoryDriftSink>, DriftRecorder) {
        let sink = Arc::new(InMemoryDriftSink::new(16));
        let dyn_sink: Arc<dyn DriftSink> = sink.clone();
        let recorder = DriftRecorder::new("drifts", dyn_sink).unwrap();
        (sink, recorder)
    }

    #[test]
    fn test_flush_empty_publishes_nothing() {
        let (sink, recorder) = recorder();
        assert!(recorder.flush().is_none());
        assert!(sink.summaries().is_empty());
    }

    #[test]
    fn test_flush_summarizes_and_resets() {
        let (sink, recorder) = recorder();
        for v in [1, 2, 3, 4, 100] {
            recorder.record(v);
        }
        assert_eq!(recorder.count(), 5);

        let summary = recorder.flush().unwrap();
        assert_eq!(summary.label, "drifts");
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min_ms, 1);
        assert_eq!(summary.max_ms, 100);
        assert_eq!(summary.p50_ms, 3);
        assert!((summary.mean_ms - 22.0).abs() < 0.5);

        assert_eq!(recorder.count(), 0);
        assert_eq!(sink.summaries(), vec![summary]);
        assert!(recorder.flush().is_none());
    }

    #[test]
    fn test_snapshot_does_not_drain() {
        let (sink, recorder) = recorder();
        recorder.record(10);
        let snap = recorder.snapshot().unwrap();
        assert_eq!(snap.count, 1);
        assert_eq!(recorder.count(), 1);
        assert!(sink.summaries().is_empty());
    }

    #[test]
    fn test_huge_sample_saturates() {
        let (_sink, recorder) = recorder();
        recorder.record(u128::MAX);
        assert_eq!(recorder.count(), 1);

        let summary = recorder.flush().unwrap();
        assert!(summary.max_ms >= MAX_RECORDED_DRIFT_MS, "max {}ms", summary.max_ms);
        assert!(summary.min_ms >= MAX_RECORDED_DRIFT_MS / 2, "min {}ms", summary.min_ms);
    }

    #[test]
    fn test_multi_second_drift_is_kept() {
        let (_sink, recorder) = recorder();
        recorder.record(5_000);

        // Three significant figures: 5000 resolves to a bucket 4ms wide.
        let summary = recorder.flush().unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.min_ms, 5_000);
        assert!((5_000..5_004).contains(&summary.max_ms), "max {}ms", summary.max_ms);
        assert!((5_000..5_004).contains(&summary.p50_ms), "p50 {}ms", summary.p50_ms);
    }

    #[test]
    fn test_report_empty_interval_publishes_zero_summary() {
        let (sink, recorder) = recorder();
        let summary = recorder.report();
        assert_eq!(summary, DriftSummary::empty("drifts"));
        assert_eq!(sink.summaries(), vec![summary]);
    }

    #[test]
    fn test_reporter_reports_every_interval_and_on_stop() {
        let (sink, recorder) = recorder();
        let recorder = Arc::new(recorder);
        let reporter = DriftReporter::start(Arc::clone(&recorder), Duration::from_millis(100)).unwrap();

        recorder.record(5);
        thread::sleep(Duration::from_millis(350));
        let summaries = sink.summaries();
        assert!(summaries.len() >= 2, "{} summaries", summaries.len());
        assert_eq!(summaries[0].count, 1);
        assert!(summaries[1..].iter().all(|s| s.count == 0));

        recorder.record(7);
        reporter.stop();
        let summaries = sink.summaries();
        let last = summaries.last().unwrap();
        assert_eq!(last.max_ms, 7);
        assert_eq!(sink.total_count(), 2);
    }
}

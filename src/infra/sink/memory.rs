//! In-memory drift sink for testing and dev.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::core::{DriftSink, DriftSummary};

/// Keeps the most recent summaries in a bounded buffer.
pub struct InMemoryDriftSink {
    summaries: Mutex<VecDeque<DriftSummary>>,
    max_summaries: usize,
}

impl InMemoryDriftSink {
    /// Create a sink retaining at most `max_summaries` entries.
    #[must_use]
    pub fn new(max_summaries: usize) -> Self {
        Self {
            summaries: Mutex::new(VecDeque::with_capacity(max_summaries)),
            max_summaries,
        }
    }

    /// Retrieve a snapshot of stored summaries, oldest first.
    #[must_use]
    pub fn summaries(&self) -> Vec<DriftSummary> {
        self.summaries.lock().iter().cloned().collect()
    }

    /// Total samples across the retained summaries.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.summaries.lock().iter().map(|s| s.count).sum()
    }
}

impl DriftSink for InMemoryDriftSink {
    fn publish(&self, summary: DriftSummary) {
        let mut summaries = self.summaries.lock();
        if summaries.len() >= self.max_summaries {
            summaries.pop_front();
        }
        summaries.push_back(summary);
    }
}

//! Admission sequence numbers used for tie-breaking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues strictly increasing ids, one per admitted task.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    /// Counter whose first id is 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Take the next id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of ids issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_increase() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.next_id(), 0);
        assert_eq!(counter.next_id(), 1);
        assert_eq!(counter.next_id(), 2);
        assert_eq!(counter.issued(), 3);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let counter = Arc::new(SequenceCounter::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                let mut ids = Vec::with_capacity(1000);
                let mut last = None;
                for _ in 0..1000 {
                    let id = counter.next_id();
                    if let Some(prev) = last {
                        assert!(id > prev);
                    }
                    last = Some(id);
                    ids.push(id);
                }
                ids
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 8000);
        assert_eq!(counter.issued(), 8000);
    }
}

//! Sync statistics.
//!
//! Counters describe what a [`ResourceSync`](crate::ResourceSync) did over
//! its lifetime. They only ever grow; a fresh engine starts from zero.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live sync counters.
///
/// All counters are atomic so worker threads can record outcomes
/// concurrently. Read them through [`snapshot`](Self::snapshot) once a batch
/// has completed.
#[derive(Debug)]
pub struct SyncStatistics {
    resource: &'static str,
    processed: AtomicU64,
    created: AtomicU64,
    updated: AtomicU64,
    failed: AtomicU64,
    unchanged: AtomicU64,
    last_batch_millis: AtomicU64,
}

impl SyncStatistics {
    /// Creates zeroed statistics for a resource type (plural name).
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            processed: AtomicU64::new(0),
            created: AtomicU64::new(0),
            updated: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            unchanged: AtomicU64::new(0),
            last_batch_millis: AtomicU64::new(0),
        }
    }

    // === Increment methods (internal use) ===

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_batch_time(&self, elapsed: Duration) {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.last_batch_millis.store(millis, Ordering::Relaxed);
    }

    // === Getter methods (public API) ===

    /// Returns the resource type name used in the summary.
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Returns the number of drafts processed (absent drafts excluded).
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Returns the number of resources created.
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    /// Returns the number of resources updated.
    pub fn updated(&self) -> u64 {
        self.updated.load(Ordering::Relaxed)
    }

    /// Returns the number of drafts that failed.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Returns the number of drafts that already matched their resource.
    pub fn unchanged(&self) -> u64 {
        self.unchanged.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            resource: self.resource,
            processed: self.processed(),
            created: self.created(),
            updated: self.updated(),
            failed: self.failed(),
            unchanged: self.unchanged(),
            last_batch_time: Duration::from_millis(
                self.last_batch_millis.load(Ordering::Relaxed),
            ),
        }
    }
}

/// A point-in-time copy of [`SyncStatistics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Resource type name (plural).
    pub resource: &'static str,
    /// Drafts processed.
    pub processed: u64,
    /// Resources created.
    pub created: u64,
    /// Resources updated.
    pub updated: u64,
    /// Drafts that failed.
    pub failed: u64,
    /// Drafts that needed no update.
    pub unchanged: u64,
    /// Wall-clock time of the most recent batch.
    pub last_batch_time: Duration,
}

impl StatisticsSnapshot {
    /// Renders the human-readable summary.
    pub fn report_message(&self) -> String {
        self.to_string()
    }

    /// Returns true if every processed draft is accounted for by exactly one outcome.
    pub fn is_balanced(&self) -> bool {
        self.processed == self.created + self.updated + self.failed + self.unchanged
    }
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} {} were processed in total ({} created, {} updated and {} {} failed to sync).",
            self.processed, self.resource, self.created, self.updated, self.failed, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = SyncStatistics::new("categories");
        let snap = stats.snapshot();
        assert_eq!(snap.processed, 0);
        assert_eq!(snap.created, 0);
        assert_eq!(snap.updated, 0);
        assert_eq!(snap.failed, 0);
        assert!(snap.is_balanced());
    }

    #[test]
    fn empty_report_message() {
        let stats = SyncStatistics::new("categories");
        assert_eq!(
            stats.snapshot().report_message(),
            "Summary: 0 categories were processed in total \
             (0 created, 0 updated and 0 categories failed to sync)."
        );
    }

    #[test]
    fn report_message_reflects_counters() {
        let stats = SyncStatistics::new("products");
        stats.record_created();
        stats.record_processed();
        stats.record_failed();
        stats.record_processed();
        stats.record_unchanged();
        stats.record_processed();

        let snap = stats.snapshot();
        assert!(snap.is_balanced());
        assert_eq!(
            snap.to_string(),
            "Summary: 3 products were processed in total \
             (1 created, 0 updated and 1 products failed to sync)."
        );
    }

    #[test]
    fn batch_time_is_kept() {
        let stats = SyncStatistics::new("products");
        stats.record_batch_time(Duration::from_millis(42));
        assert_eq!(stats.snapshot().last_batch_time, Duration::from_millis(42));
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(SyncStatistics::new("categories"));
        let mut handles = vec![];

        for _ in 0..10 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_updated();
                    s.record_processed();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.processed(), 1000);
        assert_eq!(stats.updated(), 1000);
        assert!(stats.snapshot().is_balanced());
    }
}

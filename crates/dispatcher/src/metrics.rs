//! Gate metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters for a single gate
#[derive(Debug, Default)]
pub struct GateMetrics {
    /// Events that reached `append` successfully
    appended: AtomicU64,
    /// Events suppressed by a filter, the threshold or the appender's own filter
    suppressed: AtomicU64,
    /// Re-entrant calls rejected
    recursive: AtomicU64,
    /// Delivery failures (reported, whether swallowed or propagated)
    failed: AtomicU64,
}

impl GateMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get appended count
    pub fn appended(&self) -> u64 {
        self.appended.load(Ordering::Relaxed)
    }

    /// Increment appended count
    pub fn inc_appended(&self) {
        self.appended.fetch_add(1, Ordering::Relaxed);
    }

    /// Get suppressed count
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Increment suppressed count
    pub fn inc_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get recursive call count
    pub fn recursive(&self) -> u64 {
        self.recursive.load(Ordering::Relaxed)
    }

    /// Increment recursive call count
    pub fn inc_recursive(&self) {
        self.recursive.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            appended: self.appended(),
            suppressed: self.suppressed(),
            recursive: self.recursive(),
            failed: self.failed(),
        }
    }
}

/// Snapshot of gate metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub appended: u64,
    pub suppressed: u64,
    pub recursive: u64,
    pub failed: u64,
}

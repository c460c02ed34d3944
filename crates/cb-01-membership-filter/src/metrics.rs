//! Counters for membership filter activity
//!
//! Cheap atomic counters sampled by the runtime's status logging.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for filter operations
#[derive(Default, Debug)]
pub struct FilterMetrics {
    /// Total `contains_or_add` calls
    pub checks: AtomicU64,
    /// Calls that reported a new address
    pub new_addresses: AtomicU64,
    /// Bytes written through partial writes
    pub bytes_flushed: AtomicU64,
    /// Full image writes
    pub full_saves: AtomicU64,
    /// Failed writes of any kind
    pub write_failures: AtomicU64,
    /// Verification passes that found a mismatch
    pub verify_mismatches: AtomicU64,
}

impl FilterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_check(&self, is_new: bool) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        if is_new {
            self.new_addresses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_bytes_flushed(&self, count: usize) {
        self.bytes_flushed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_full_save(&self) {
        self.full_saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verify_mismatch(&self) {
        self.verify_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> FilterMetricsSnapshot {
        FilterMetricsSnapshot {
            checks: self.checks.load(Ordering::Relaxed),
            new_addresses: self.new_addresses.load(Ordering::Relaxed),
            bytes_flushed: self.bytes_flushed.load(Ordering::Relaxed),
            full_saves: self.full_saves.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            verify_mismatches: self.verify_mismatches.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`FilterMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterMetricsSnapshot {
    pub checks: u64,
    pub new_addresses: u64,
    pub bytes_flushed: u64,
    pub full_saves: u64,
    pub write_failures: u64,
    pub verify_mismatches: u64,
}

impl FilterMetricsSnapshot {
    /// Share of checks that reported a new address.
    pub fn new_ratio(&self) -> f64 {
        if self.checks == 0 {
            0.0
        } else {
            self.new_addresses as f64 / self.checks as f64
        }
    }
}

/// Filter occupancy plus activity counters, reported in engine logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterHealth {
    pub bits_set: usize,
    /// Fill of the fullest region
    pub max_region_fill: f64,
    pub false_positive_rate: f64,
    pub activity: FilterMetricsSnapshot,
}

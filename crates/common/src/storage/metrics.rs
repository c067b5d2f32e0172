//! Connection pool counters
//!
//! Relaxed atomics only; readers take a [`PoolMetricsSnapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolMetricsSnapshot {
    pub acquired: u64,
    pub timeouts: u64,
    pub errors: u64,
    pub avg_acquire_ms: u64,
}

/// Counts connection checkouts and their failures.
#[derive(Debug)]
pub struct StorageMetrics {
    acquired: AtomicU64,
    timeouts: AtomicU64,
    errors: AtomicU64,
    acquire_ms_total: AtomicU64,
    max_pool_size: u32,
}

impl StorageMetrics {
    pub const fn new(max_pool_size: u32) -> Self {
        Self {
            acquired: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            acquire_ms_total: AtomicU64::new(0),
            max_pool_size,
        }
    }

    pub fn record_acquired(&self, waited_ms: u64) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        self.acquire_ms_total.fetch_add(waited_ms, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        let acquired = self.acquired.load(Ordering::Relaxed);
        let total_ms = self.acquire_ms_total.load(Ordering::Relaxed);
        PoolMetricsSnapshot {
            acquired,
            timeouts: self.timeouts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            avg_acquire_ms: total_ms.checked_div(acquired).unwrap_or(0),
        }
    }

    pub const fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }
}

//! Worker telemetry for observability.
//!
//! Lock-free atomic counters record what the interceptor and seeder did;
//! [`WorkerMetrics::snapshot`] takes a point-in-time copy for display. No
//! failure counted here is ever surfaced to a map user - a missing tile
//! renders as a gap, and these counters are the only record of why.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free event counters shared by all worker flows.
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    pass_throughs: AtomicU64,
    network_fetches: AtomicU64,
    network_errors: AtomicU64,
    store_failures: AtomicU64,
    urls_seeded: AtomicU64,
    seed_failures: AtomicU64,
}

impl WorkerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// An intercepted request was answered from cache.
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// An intercepted request found no cached entry.
    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A request's host was not allowlisted; nothing was done.
    pub fn pass_through(&self) {
        self.pass_throughs.fetch_add(1, Ordering::Relaxed);
    }

    /// A network fetch completed (readable or opaque).
    pub fn network_fetch(&self) {
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// A network fetch never completed.
    pub fn network_error(&self) {
        self.network_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// A cache write failed and was swallowed.
    pub fn store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A seed URL was fetched and stored.
    pub fn url_seeded(&self) {
        self.urls_seeded.fetch_add(1, Ordering::Relaxed);
    }

    /// A seed URL failed (fetch or store) and was skipped.
    pub fn seed_failure(&self) {
        self.seed_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            pass_throughs: self.pass_throughs.load(Ordering::Relaxed),
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            urls_seeded: self.urls_seeded.load(Ordering::Relaxed),
            seed_failures: self.seed_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the worker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub pass_throughs: u64,
    pub network_fetches: u64,
    pub network_errors: u64,
    pub store_failures: u64,
    pub urls_seeded: u64,
    pub seed_failures: u64,
}

impl MetricsSnapshot {
    /// Cache hit rate over all intercepted lookups, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

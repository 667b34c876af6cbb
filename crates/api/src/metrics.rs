use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Requests
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,
    total_request_time_us: AtomicU64,

    // Data tree
    documents_fetched: AtomicUsize,
    cache_hits: AtomicUsize,
    fetch_failures: AtomicUsize,

    // Run selection
    runs_loaded: AtomicUsize,
    stale_runs_discarded: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_request_time_us: AtomicU64::new(0),
            documents_fetched: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            fetch_failures: AtomicUsize::new(0),
            runs_loaded: AtomicUsize::new(0),
            stale_runs_discarded: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool, duration: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
        self.total_request_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// One document read from the data tree or the cache.
    pub fn record_fetch(&self, cache_hit: bool, success: bool) {
        if cache_hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else if success {
            self.documents_fetched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_run_load(&self, stored: bool) {
        self.runs_loaded.fetch_add(1, Ordering::Relaxed);
        if !stored {
            self.stale_runs_discarded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_us = self.total_request_time_us.load(Ordering::Relaxed) as f64;
        let avg_request_time_ms = if total_requests > 0 {
            total_us / total_requests as f64 / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_request_time_ms,
            documents_fetched: self.documents_fetched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            runs_loaded: self.runs_loaded.load(Ordering::Relaxed),
            stale_runs_discarded: self.stale_runs_discarded.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub avg_request_time_ms: f64,
    pub documents_fetched: usize,
    pub cache_hits: usize,
    pub fetch_failures: usize,
    pub runs_loaded: usize,
    pub stale_runs_discarded: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.record_request(true, Duration::from_millis(2));
        metrics.record_request(false, Duration::from_millis(4));
        metrics.record_fetch(true, true);
        metrics.record_fetch(false, true);
        metrics.record_fetch(false, false);
        metrics.record_run_load(true);
        metrics.record_run_load(false);

        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.avg_request_time_ms, 3.0);
        assert_eq!((snapshot.cache_hits, snapshot.documents_fetched, snapshot.fetch_failures), (1, 1, 1));
        assert_eq!((snapshot.runs_loaded, snapshot.stale_runs_discarded), (2, 1));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.avg_request_time_ms, 0.0);
    }
}

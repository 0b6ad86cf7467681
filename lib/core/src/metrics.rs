//! In-process request metrics
//!
//! All counters sit behind one mutex so a snapshot never observes a
//! half-applied `record`. The critical section does no I/O.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    error_count: u64,
    total_latency_ms: f64,
    requests_by_path: HashMap<String, u64>,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub error_count: u64,
    pub average_latency_ms: f64,
    pub requests_by_path: BTreeMap<String, u64>,
}

/// Request counters for the lifetime of the process
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    counters: Mutex<Counters>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished request. Status codes >= 400 count as errors.
    pub fn record(&self, path: &str, latency_ms: f64, status_code: u16) {
        let mut counters = self.counters.lock();
        counters.total_requests += 1;
        counters.total_latency_ms += latency_ms;
        *counters.requests_by_path.entry(path.to_string()).or_insert(0) += 1;
        if status_code >= 400 {
            counters.error_count += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.counters.lock();
        let average = if counters.total_requests > 0 {
            counters.total_latency_ms / counters.total_requests as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: counters.total_requests,
            error_count: counters.error_count,
            average_latency_ms: round2(average),
            requests_by_path: counters
                .requests_by_path
                .iter()
                .map(|(path, count)| (path.clone(), *count))
                .collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_snapshot() {
        let metrics = MetricsAggregator::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.average_latency_ms, 0.0);
        assert!(snapshot.requests_by_path.is_empty());
    }

    #[test]
    fn test_error_count() {
        let metrics = MetricsAggregator::new();
        let statuses = [200, 201, 400, 404, 500, 302, 399, 502];
        for status in statuses {
            metrics.record("/tasks", 1.0, status);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 8);
        assert_eq!(snapshot.error_count, 4);
    }

    #[test]
    fn test_average_latency() {
        let metrics = MetricsAggregator::new();
        for latency in [10.0, 20.0, 30.0] {
            metrics.record("/health", latency, 200);
        }
        assert_eq!(metrics.snapshot().average_latency_ms, 20.0);
    }

    #[test]
    fn test_average_latency_rounded_to_two_places() {
        let metrics = MetricsAggregator::new();
        for latency in [1.0, 1.0, 2.0] {
            metrics.record("/health", latency, 200);
        }
        assert_eq!(metrics.snapshot().average_latency_ms, 1.33);
    }

    #[test]
    fn test_requests_by_path() {
        let metrics = MetricsAggregator::new();
        for path in ["/a", "/a", "/b"] {
            metrics.record(path, 5.0, 200);
        }

        let by_path = metrics.snapshot().requests_by_path;
        assert_eq!(by_path.len(), 2);
        assert_eq!(by_path["/a"], 2);
        assert_eq!(by_path["/b"], 1);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let metrics = MetricsAggregator::new();
        metrics.record("/metrics", 2.5, 200);

        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_requests": 1,
                "error_count": 0,
                "average_latency_ms": 2.5,
                "requests_by_path": {"/metrics": 1}
            })
        );
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        const THREADS: usize = 1000;
        let metrics = Arc::new(MetricsAggregator::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    let status = if i % 4 == 0 { 500 } else { 200 };
                    metrics.record(if i % 2 == 0 { "/even" } else { "/odd" }, 1.0, status);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, THREADS as u64);
        assert_eq!(snapshot.error_count, (THREADS / 4) as u64);
        assert_eq!(snapshot.requests_by_path["/even"], (THREADS / 2) as u64);
        assert_eq!(snapshot.requests_by_path["/odd"], (THREADS / 2) as u64);
        assert_eq!(snapshot.average_latency_ms, 1.0);
    }

    #[test]
    fn test_snapshots_are_consistent_under_contention() {
        let metrics = Arc::new(MetricsAggregator::new());
        let writer = {
            let metrics = metrics.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    metrics.record("/x", 1.0, 404);
                }
            })
        };

        for _ in 0..1000 {
            let snapshot = metrics.snapshot();
            let path_total: u64 = snapshot.requests_by_path.values().sum();
            assert_eq!(path_total, snapshot.total_requests);
            assert!(snapshot.error_count <= snapshot.total_requests);
        }

        writer.join().unwrap();
    }
}

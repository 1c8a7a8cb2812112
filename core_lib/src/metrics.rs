//! In-process request and relay counters

use std::collections::{HashMap, VecDeque};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

const LATENCY_SAMPLES: usize = 1000;

#[derive(Clone)]
pub struct MetricsCollector {
    total_requests: Arc<AtomicU64>,
    failed_requests: Arc<AtomicU64>,
    requests_by_endpoint: Arc<RwLock<HashMap<String, u64>>>,
    latencies_ms: Arc<RwLock<VecDeque<u64>>>,
    contacts_relayed: Arc<AtomicU64>,
    confirmations_failed: Arc<AtomicU64>,
    deliveries_failed: Arc<AtomicU64>,
    start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub error_rate: f64,
    pub average_response_time_ms: f64,
    pub requests_by_endpoint: Vec<EndpointMetric>,
    pub contacts_relayed: u64,
    pub confirmations_failed: u64,
    pub deliveries_failed: u64,
    pub uptime_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct EndpointMetric {
    pub endpoint: String,
    pub count: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_requests: Arc::new(AtomicU64::new(0)),
            failed_requests: Arc::new(AtomicU64::new(0)),
            requests_by_endpoint: Arc::new(RwLock::new(HashMap::new())),
            latencies_ms: Arc::new(RwLock::new(VecDeque::with_capacity(LATENCY_SAMPLES))),
            contacts_relayed: Arc::new(AtomicU64::new(0)),
            confirmations_failed: Arc::new(AtomicU64::new(0)),
            deliveries_failed: Arc::new(AtomicU64::new(0)),
            start_time: Utc::now(),
        }
    }

    pub fn record_response(&self, method: &str, path: &str, duration_ms: u64, status: u16) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if status >= 400 {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }

        *self
            .requests_by_endpoint
            .write()
            .entry(format!("{} {}", method, path))
            .or_insert(0) += 1;

        let mut latencies = self.latencies_ms.write();
        if latencies.len() == LATENCY_SAMPLES {
            latencies.pop_front();
        }
        latencies.push_back(duration_ms);
    }

    pub fn record_contact(&self, confirmation_sent: bool) {
        self.contacts_relayed.fetch_add(1, Ordering::Relaxed);
        if !confirmation_sent {
            self.confirmations_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_delivery_failure(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);
        let failed = self.failed_requests.load(Ordering::Relaxed);

        let mut endpoints: Vec<EndpointMetric> = self
            .requests_by_endpoint
            .read()
            .iter()
            .map(|(endpoint, count)| EndpointMetric {
                endpoint: endpoint.clone(),
                count: *count,
            })
            .collect();
        endpoints.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.endpoint.cmp(&b.endpoint)));

        let latencies = self.latencies_ms.read();
        let average_response_time_ms = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
        };

        MetricsSnapshot {
            total_requests: total,
            failed_requests: failed,
            error_rate: if total > 0 {
                failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            average_response_time_ms,
            requests_by_endpoint: endpoints,
            contacts_relayed: self.contacts_relayed.load(Ordering::Relaxed),
            confirmations_failed: self.confirmations_failed.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            uptime_seconds: Utc::now().signed_duration_since(self.start_time).num_seconds(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_aggregates() {
        let metrics = MetricsCollector::new();
        metrics.record_response("GET", "/api/quote", 10, 200);
        metrics.record_response("GET", "/api/quote", 30, 200);
        metrics.record_response("POST", "/api/contact", 20, 400);
        metrics.record_contact(false);
        metrics.record_delivery_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.failed_requests, 1);
        assert!((snapshot.average_response_time_ms - 20.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.requests_by_endpoint[0].endpoint, "GET /api/quote");
        assert_eq!(snapshot.requests_by_endpoint[0].count, 2);
        assert_eq!(snapshot.contacts_relayed, 1);
        assert_eq!(snapshot.confirmations_failed, 1);
        assert_eq!(snapshot.deliveries_failed, 1);
    }

    #[test]
    fn test_latency_window_is_bounded() {
        let metrics = MetricsCollector::new();
        for _ in 0..LATENCY_SAMPLES + 10 {
            metrics.record_response("GET", "/health", 1, 200);
        }
        assert_eq!(metrics.latencies_ms.read().len(), LATENCY_SAMPLES);
    }
}

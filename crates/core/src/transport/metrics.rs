use std::sync::atomic::{AtomicU64, Ordering};

use crate::transport::TabId;

pub struct TransportMetrics {
    pub sent_total: AtomicU64,
    pub unrouted_total: AtomicU64,
    pub remote_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportMetricsSnapshot {
    pub sent_total: u64,
    pub unrouted_total: u64,
    pub remote_failures_total: u64,
}

impl TransportMetrics {
    pub fn new() -> Self {
        Self {
            sent_total: AtomicU64::new(0),
            unrouted_total: AtomicU64::new(0),
            remote_failures_total: AtomicU64::new(0),
        }
    }

    pub fn record_sent(&self) {
        self.sent_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrouted(&self, _tab: TabId) {
        self.unrouted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_failure(&self) {
        self.remote_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TransportMetricsSnapshot {
        TransportMetricsSnapshot {
            sent_total: self.sent_total.load(Ordering::Relaxed),
            unrouted_total: self.unrouted_total.load(Ordering::Relaxed),
            remote_failures_total: self.remote_failures_total.load(Ordering::Relaxed),
        }
    }
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self::new()
    }
}

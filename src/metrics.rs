//! Counters for the demo mint driver.
//!
//! All counters are backed by atomics for lock-free concurrent access.

use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregated counters for a mint run.
///
/// Thread-safe via atomics; shareable via `Arc<Metrics>`.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total number of mint requests accepted.
    pub requests_received: AtomicU64,
    /// Total number of mints completed.
    pub mints_completed: AtomicU64,
    /// Total number of fulfillments that failed.
    pub mints_failed: AtomicU64,
}

impl Metrics {
    /// Create a new zeroed metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted mint request.
    pub fn record_request(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed mint.
    pub fn record_mint(&self) {
        self.mints_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed fulfillment.
    pub fn record_failure(&self) {
        self.mints_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Serialize the counters as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests_received": self.requests_received.load(Ordering::Relaxed),
            "mints_completed": self.mints_completed.load(Ordering::Relaxed),
            "mints_failed": self.mints_failed.load(Ordering::Relaxed),
        })
    }
}

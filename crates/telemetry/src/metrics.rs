//! Internal metrics collection.
//!
//! Process-global counters for the admin auth flow, exposed through the
//! health endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Collected metrics for the admin session service.
#[derive(Debug, Default)]
pub struct Metrics {
    // Login flow
    pub login_attempts: Counter,
    pub logins_succeeded: Counter,
    pub logins_failed: Counter,
    pub logins_rate_limited: Counter,

    // Session lifecycle
    pub sessions_expired: Counter,
    pub logouts: Counter,
    pub storage_failures: Counter,

    /// Session bags currently held by the store.
    pub sessions_stored: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub login_attempts: u64,
    pub logins_succeeded: u64,
    pub logins_failed: u64,
    pub logins_rate_limited: u64,
    pub sessions_expired: u64,
    pub logouts: u64,
    pub storage_failures: u64,
    pub sessions_stored: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            login_attempts: self.login_attempts.get(),
            logins_succeeded: self.logins_succeeded.get(),
            logins_failed: self.logins_failed.get(),
            logins_rate_limited: self.logins_rate_limited.get(),
            sessions_expired: self.sessions_expired.get(),
            logouts: self.logouts.get(),
            storage_failures: self.storage_failures.get(),
            sessions_stored: self.sessions_stored.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}

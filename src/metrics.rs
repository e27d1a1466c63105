//! Per-lifecycle counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters owned by one lifecycle instance
#[derive(Debug, Default)]
pub struct ClientMetrics {
    // Connection metrics
    pub connections_established: AtomicU64,
    pub connect_failures: AtomicU64,

    // Consumer metrics
    pub records_dispatched: AtomicU64,
    pub bytes_dispatched: AtomicU64,
    pub handler_errors: AtomicU64,

    // Producer metrics
    pub records_sent: AtomicU64,
    pub bytes_sent: AtomicU64,

    // Out-of-band errors routed to the sink
    pub runtime_errors: AtomicU64,
}

impl ClientMetrics {
    /// Record a successful connection
    pub fn record_connection_established(&self) {
        self.connections_established.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed connect attempt
    pub fn record_connect_failure(&self) {
        self.connect_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one delivered record fanned out to handlers
    pub fn record_dispatched(&self, byte_count: u64) {
        self.records_dispatched.fetch_add(1, Ordering::Relaxed);
        self.bytes_dispatched.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a handler returning an error
    pub fn record_handler_error(&self) {
        self.handler_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful send operation
    pub fn record_send(&self, byte_count: u64) {
        self.records_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an out-of-band error reported to the sink
    pub fn record_runtime_error(&self) {
        self.runtime_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_established: self.connections_established.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            records_dispatched: self.records_dispatched.load(Ordering::Relaxed),
            bytes_dispatched: self.bytes_dispatched.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            records_sent: self.records_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            runtime_errors: self.runtime_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of counters at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections_established: u64,
    pub connect_failures: u64,
    pub records_dispatched: u64,
    pub bytes_dispatched: u64,
    pub handler_errors: u64,
    pub records_sent: u64,
    pub bytes_sent: u64,
    pub runtime_errors: u64,
}

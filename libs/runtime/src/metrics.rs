//! Dispatch metrics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters updated by `deliver()` and the dispatch loop
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    pub messages_delivered: AtomicU64,
    pub messages_handled: AtomicU64,
    pub messages_failed: AtomicU64,
    /// Dequeued with no actor registered for their type and discarded
    pub messages_unrouted: AtomicU64,
    pub total_handling_time_ns: AtomicU64,
}

impl RuntimeMetrics {
    pub fn record_delivered(&self) {
        self.messages_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrouted(&self) {
        self.messages_unrouted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed `handle` call, successful or not
    pub fn record_handled(&self, duration: Duration, success: bool) {
        if !success {
            self.messages_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.messages_handled.fetch_add(1, Ordering::Relaxed);
        self.total_handling_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn avg_handling_time_ns(&self) -> f64 {
        let count = self.messages_handled.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.total_handling_time_ns.load(Ordering::Relaxed) as f64 / count as f64
    }

    pub fn snapshot(&self, mailbox_depth: usize, running: bool) -> RuntimeStats {
        RuntimeStats {
            running,
            mailbox_depth,
            messages_delivered: self.messages_delivered.load(Ordering::Relaxed),
            messages_handled: self.messages_handled.load(Ordering::Relaxed),
            messages_failed: self.messages_failed.load(Ordering::Relaxed),
            messages_unrouted: self.messages_unrouted.load(Ordering::Relaxed),
            avg_handling_time_ns: self.avg_handling_time_ns(),
        }
    }
}

/// Point-in-time view of a runtime
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStats {
    pub running: bool,
    pub mailbox_depth: usize,
    pub messages_delivered: u64,
    pub messages_handled: u64,
    pub messages_failed: u64,
    pub messages_unrouted: u64,
    pub avg_handling_time_ns: f64,
}

impl RuntimeStats {
    pub fn messages_succeeded(&self) -> u64 {
        // Counters are read independently, so a snapshot can race a failure
        self.messages_handled.saturating_sub(self.messages_failed)
    }
}

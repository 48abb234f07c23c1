//! Statistics tracking module
//!
//! Provides the counters shared by the producer and consumer tasks and the
//! pure report generation over a finished run.

pub mod report;

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub use report::{generate_report, AnalysisReport, Efficiency, ReportInput, RunIdentity};

/// Counters updated concurrently by both tasks.
///
/// Every field is an atomic so neither side needs the other's lock to record
/// progress; increments are never lost.
#[derive(Debug, Default)]
pub struct PipelineStats {
    items_produced: AtomicU64,
    items_consumed: AtomicU64,
    items_skipped: AtomicU64,
    producer_wait_nanos: AtomicU64,
    consumer_wait_nanos: AtomicU64,
    max_queue_depth: AtomicUsize,
}

impl PipelineStats {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one item put by the producer, with the depth observed after the put
    pub fn record_produced(&self, depth_after_put: usize) {
        self.items_produced.fetch_add(1, Ordering::Relaxed);
        self.max_queue_depth.fetch_max(depth_after_put, Ordering::Relaxed);
    }

    /// Record one item appended to the destination by the consumer
    pub fn record_consumed(&self) {
        self.items_consumed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an absent source entry skipped by the producer
    pub fn record_skipped(&self) {
        self.items_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Accumulate time the producer spent inside `put`
    pub fn add_producer_wait(&self, waited: Duration) {
        self.producer_wait_nanos.fetch_add(duration_nanos(waited), Ordering::Relaxed);
    }

    /// Accumulate time the consumer spent inside `take`
    pub fn add_consumer_wait(&self, waited: Duration) {
        self.consumer_wait_nanos.fetch_add(duration_nanos(waited), Ordering::Relaxed);
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.items_produced.store(0, Ordering::Relaxed);
        self.items_consumed.store(0, Ordering::Relaxed);
        self.items_skipped.store(0, Ordering::Relaxed);
        self.producer_wait_nanos.store(0, Ordering::Relaxed);
        self.consumer_wait_nanos.store(0, Ordering::Relaxed);
        self.max_queue_depth.store(0, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            items_produced: self.items_produced.load(Ordering::Relaxed),
            items_consumed: self.items_consumed.load(Ordering::Relaxed),
            items_skipped: self.items_skipped.load(Ordering::Relaxed),
            producer_wait: Duration::from_nanos(self.producer_wait_nanos.load(Ordering::Relaxed)),
            consumer_wait: Duration::from_nanos(self.consumer_wait_nanos.load(Ordering::Relaxed)),
            max_queue_depth: self.max_queue_depth.load(Ordering::Relaxed),
        }
    }
}

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Point-in-time copy of [`PipelineStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub items_produced: u64,
    pub items_consumed: u64,
    pub items_skipped: u64,
    pub producer_wait: Duration,
    pub consumer_wait: Duration,
    pub max_queue_depth: usize,
}

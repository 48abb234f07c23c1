//! Analysis report generation
//!
//! Turns the final [`StatsSnapshot`] of a run, together with the source and
//! destination sequences, into a structured [`AnalysisReport`]. Generation is
//! pure: it never performs I/O. Handing the report to a sink is the caller's
//! responsibility.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::queue::QueueStrategy;
use crate::stats::StatsSnapshot;
use crate::version::report_schema_version;

/// Queue efficiency tier derived from the utilization rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Efficiency {
    High,
    Medium,
    Low,
}

impl Efficiency {
    /// `> 80%` is High, `> 50%` is Medium, anything else Low
    pub fn from_utilization(rate: f64) -> Self {
        if rate > 80.0 {
            Efficiency::High
        } else if rate > 50.0 {
            Efficiency::Medium
        } else {
            Efficiency::Low
        }
    }
}

impl std::fmt::Display for Efficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Efficiency::High => f.write_str("High"),
            Efficiency::Medium => f.write_str("Medium"),
            Efficiency::Low => f.write_str("Low"),
        }
    }
}

/// Identity stamped on every report of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunIdentity {
    pub run_id: Uuid,
    pub started_at: DateTime<Local>,
}

impl RunIdentity {
    /// Fresh v4 run id at the current local time
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything report generation needs from a finished run
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub run_id: Uuid,
    pub generated_at: DateTime<Local>,
    pub strategy: QueueStrategy,
    pub capacity: usize,
    pub stats: StatsSnapshot,
    pub source: &'a [i64],
    pub destination: &'a [i64],
    pub total_time: Option<Duration>,
}

impl<'a> ReportInput<'a> {
    /// Input stamped with a fresh run id and the current local time
    pub fn new(
        strategy: QueueStrategy,
        capacity: usize,
        stats: StatsSnapshot,
        source: &'a [i64],
        destination: &'a [i64],
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Local::now(),
            strategy,
            capacity,
            stats,
            source,
            destination,
            total_time: None,
        }
    }

    /// Stamp the input with an existing run identity
    pub fn with_identity(mut self, identity: RunIdentity) -> Self {
        self.run_id = identity.run_id;
        self.generated_at = identity.started_at;
        self
    }

    /// Attach the wall-clock duration of the run
    pub fn with_total_time(mut self, total_time: Duration) -> Self {
        self.total_time = Some(total_time);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicCounts {
    pub capacity: usize,
    pub items_produced: u64,
    pub items_consumed: u64,
    pub items_skipped: u64,
    pub source_size: usize,
    pub destination_size: usize,
    pub max_queue_depth: usize,
}

/// Timing figures, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingAnalysis {
    pub total_time_ms: Option<f64>,
    pub average_time_per_item_ms: Option<f64>,
    pub producer_wait_ms: f64,
    pub consumer_wait_ms: f64,
    pub average_producer_wait_ms: Option<f64>,
    pub average_consumer_wait_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueUtilization {
    /// `max_queue_depth / capacity * 100`
    pub utilization_rate: f64,
    pub efficiency: Efficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityCheck {
    /// Destination equals source, same values in the same order
    pub data_match: bool,
    pub count_match: bool,
    /// Every produced item was consumed
    pub no_loss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynchronizationEvidence {
    /// `|produced - consumed| <= 1`
    pub balanced: bool,
    pub blocking_observed: bool,
}

/// Structured outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub schema_version: i64,
    pub run_id: Uuid,
    pub generated_at: DateTime<Local>,
    pub strategy: QueueStrategy,
    pub mechanism: String,
    pub counts: BasicCounts,
    pub timing: TimingAnalysis,
    pub utilization: QueueUtilization,
    pub integrity: IntegrityCheck,
    pub synchronization: SynchronizationEvidence,
}

impl AnalysisReport {
    /// No loss, no duplication, no reordering
    pub fn integrity_passed(&self) -> bool {
        self.integrity.data_match && self.integrity.count_match && self.integrity.no_loss
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

fn per_item(total_ms: f64, items: u64) -> Option<f64> {
    (items > 0).then(|| total_ms / items as f64)
}

/// Build the report for a finished run
pub fn generate_report(input: &ReportInput<'_>) -> AnalysisReport {
    let stats = &input.stats;

    let counts = BasicCounts {
        capacity: input.capacity,
        items_produced: stats.items_produced,
        items_consumed: stats.items_consumed,
        items_skipped: stats.items_skipped,
        source_size: input.source.len(),
        destination_size: input.destination.len(),
        max_queue_depth: stats.max_queue_depth,
    };

    let total_time_ms = input.total_time.map(millis);
    let producer_wait_ms = millis(stats.producer_wait);
    let consumer_wait_ms = millis(stats.consumer_wait);
    let timing = TimingAnalysis {
        total_time_ms,
        average_time_per_item_ms: total_time_ms.and_then(|total| per_item(total, stats.items_consumed)),
        producer_wait_ms,
        consumer_wait_ms,
        average_producer_wait_ms: per_item(producer_wait_ms, stats.items_produced),
        average_consumer_wait_ms: per_item(consumer_wait_ms, stats.items_consumed),
    };

    let utilization_rate = if input.capacity > 0 {
        stats.max_queue_depth as f64 / input.capacity as f64 * 100.0
    } else {
        0.0
    };
    let utilization = QueueUtilization {
        utilization_rate,
        efficiency: Efficiency::from_utilization(utilization_rate),
    };

    let integrity = IntegrityCheck {
        data_match: input.source == input.destination,
        count_match: input.source.len() == input.destination.len(),
        no_loss: stats.items_produced == stats.items_consumed,
    };

    let synchronization = SynchronizationEvidence {
        balanced: stats.items_produced.abs_diff(stats.items_consumed) <= 1,
        blocking_observed: !stats.producer_wait.is_zero() || !stats.consumer_wait.is_zero(),
    };

    AnalysisReport {
        schema_version: report_schema_version(),
        run_id: input.run_id,
        generated_at: input.generated_at,
        strategy: input.strategy,
        mechanism: input.strategy.mechanism().to_string(),
        counts,
        timing,
        utilization,
        integrity,
        synchronization,
    }
}

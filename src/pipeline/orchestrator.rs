//! Pipeline Orchestrator
//!
//! Owns construction, the run lifecycle, reset and verification. Each run
//! spawns one producer and one consumer thread against the same queue and
//! joins both before analysing the outcome. `run` takes `&mut self`, so a
//! second run cannot start before the previous one has joined.

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult, TaskRole};
use crate::output::{LogSink, ReportSink};
use crate::pipeline::{CancelHandle, CancellationToken, Consumer, Producer, SourceSequence, TaskDelays};
use crate::queue::{BoundedQueue, QueueResult, QueueStrategy};
use crate::stats::{generate_report, AnalysisReport, PipelineStats, ReportInput, RunIdentity, StatsSnapshot};

/// Bounded-buffer producer/consumer pipeline
pub struct Pipeline {
    capacity: usize,
    queue: Arc<dyn BoundedQueue<i64>>,
    source: SourceSequence,
    destination: Arc<Mutex<Vec<i64>>>,
    stats: Arc<PipelineStats>,
    token: Arc<CancellationToken>,
    delays: TaskDelays,
    sink: Box<dyn ReportSink>,
    identity: RunIdentity,
    last_run_time: Option<Duration>,
    last_report: Option<AnalysisReport>,
}

impl Pipeline {
    /// Create a pipeline using the native blocking queue
    pub fn new(capacity: usize) -> PipelineResult<Self> {
        Self::with_strategy(capacity, QueueStrategy::default())
    }

    /// Create a pipeline backed by the given queue strategy
    pub fn with_strategy(capacity: usize, strategy: QueueStrategy) -> PipelineResult<Self> {
        if capacity == 0 {
            return Err(PipelineError::configuration("Queue capacity must be greater than 0"));
        }
        let queue = strategy
            .build::<i64>(capacity)
            .map_err(|e| PipelineError::configuration(e.to_string()))?;

        debug!("Created {} pipeline with capacity {}", strategy, capacity);
        Ok(Self {
            capacity,
            queue,
            source: SourceSequence::default(),
            destination: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(PipelineStats::new()),
            token: Arc::new(CancellationToken::new()),
            delays: TaskDelays::none(),
            sink: Box::new(LogSink::new()),
            identity: RunIdentity::new(),
            last_run_time: None,
            last_report: None,
        })
    }

    /// Create a pipeline from validated configuration.
    ///
    /// The configured item count is not applied here; pass it to [`run`](Self::run).
    pub fn from_config(config: &PipelineConfig) -> PipelineResult<Self> {
        let settings = config.validate()?;
        Ok(Self::with_strategy(settings.capacity, settings.strategy)?.with_delays(settings.delays))
    }

    /// Set the simulated per-item production and consumption cost
    pub fn with_delays(mut self, delays: TaskDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Replace the sink that receives each run's report
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy(&self) -> QueueStrategy {
        self.queue.strategy()
    }

    /// Handle that cancels an in-flight run from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(Arc::clone(&self.token), Arc::clone(&self.queue))
    }

    /// Replace the source with `[1, 2, ..., count]`
    pub fn initialize_source(&mut self, count: usize) -> PipelineResult<()> {
        self.source = SourceSequence::from_count(count)?;
        info!("Source container initialized with {} items", count);
        Ok(())
    }

    /// Replace the source with a copy of `items`
    pub fn initialize_source_items(&mut self, items: &[i64]) {
        self.source = SourceSequence::from_items(items);
        info!("Source container initialized with {} custom items", items.len());
    }

    /// Replace the source with entries that may be absent
    pub fn initialize_source_with_gaps(&mut self, entries: Vec<Option<i64>>) {
        self.source = SourceSequence::from_entries(entries);
        info!(
            "Source container initialized with {} entries ({} absent)",
            self.source.len(),
            self.source.absent_len()
        );
    }

    /// Independent copy of the source's present items
    pub fn source_container(&self) -> Vec<i64> {
        self.source.present()
    }

    /// Independent copy of the destination, safe to call during a run
    pub fn destination_container(&self) -> Vec<i64> {
        self.destination.lock().clone()
    }

    /// Current counter values
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Report of the most recent completed run
    pub fn last_report(&self) -> Option<&AnalysisReport> {
        self.last_report.as_ref()
    }

    /// Clear counters, destination and queue signals; the source is kept
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        self.destination.lock().clear();
        self.queue.reset();
        self.token.reset();
        self.last_run_time = None;
    }

    /// Regenerate the source as `[1, 2, ..., item_count]` and run
    pub fn run(&mut self, item_count: usize) -> PipelineResult<AnalysisReport> {
        self.initialize_source(item_count)?;
        self.run_current_source()
    }

    /// Run producer and consumer over the current source.
    ///
    /// Blocks until both tasks have joined, then verifies the transfer, emits
    /// the report to the sink and returns it. A cancelled run returns
    /// [`PipelineError::Cancelled`] with partial destination and stats kept.
    pub fn run_current_source(&mut self) -> PipelineResult<AnalysisReport> {
        self.reset_statistics();
        self.identity = RunIdentity::new();
        let expected = self.source.present_len();

        info!(
            "Starting producer-consumer pipeline: strategy={}, capacity={}, items={}",
            self.strategy(),
            self.capacity,
            expected
        );

        let started = Instant::now();
        let (producer_outcome, consumer_outcome) = self.execute(expected)?;
        let elapsed = started.elapsed();
        self.last_run_time = Some(elapsed);

        let produced = producer_outcome.map_err(|e| PipelineError::from_queue(e, TaskRole::Producer));
        let consumed = consumer_outcome.map_err(|e| PipelineError::from_queue(e, TaskRole::Consumer));
        let (produced, consumed) = match (produced, consumed) {
            (Ok(produced), Ok(consumed)) => (produced, consumed),
            (Err(e), _) | (_, Err(e)) => {
                let snapshot = self.stats.snapshot();
                warn!(
                    "Run stopped early: {} (produced {}, consumed {})",
                    e, snapshot.items_produced, snapshot.items_consumed
                );
                return Err(e);
            }
        };

        info!("All threads completed in {:.2} ms", elapsed.as_secs_f64() * 1000.0);
        self.verify(expected, produced, consumed);

        let report = self.perform_analysis();
        if let Err(e) = self.sink.emit(&report) {
            warn!("Report sink '{}' failed: {:#}", self.sink.name(), e);
        }
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Build the analysis report for the current state. Performs no I/O.
    ///
    /// Reports of the same run share its id and timestamp, so analysing an
    /// unchanged state twice yields equal reports.
    pub fn perform_analysis(&self) -> AnalysisReport {
        let source = self.source.present();
        let destination = self.destination_container();
        let mut input = ReportInput::new(self.strategy(), self.capacity, self.stats.snapshot(), &source, &destination)
            .with_identity(self.identity);
        if let Some(total_time) = self.last_run_time {
            input = input.with_total_time(total_time);
        }
        generate_report(&input)
    }

    fn execute(&self, expected: usize) -> PipelineResult<(QueueResult<u64>, QueueResult<u64>)> {
        let producer = Producer::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.stats),
            Arc::clone(&self.token),
            self.delays.production,
        );
        let entries = self.source.shared_entries();
        let producer_handle = thread::Builder::new()
            .name("producer".to_string())
            .spawn(move || producer.run(&entries))
            .map_err(|source| PipelineError::Spawn { task: TaskRole::Producer, source })?;

        let consumer = Consumer::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.stats),
            Arc::clone(&self.token),
            Arc::clone(&self.destination),
            self.delays.consumption,
        );
        let consumer_handle = match thread::Builder::new()
            .name("consumer".to_string())
            .spawn(move || consumer.run(expected))
        {
            Ok(handle) => handle,
            Err(source) => {
                // The producer may be blocked on a full queue with nobody to drain it.
                self.queue.cancel();
                let _ = producer_handle.join();
                return Err(PipelineError::Spawn { task: TaskRole::Consumer, source });
            }
        };

        let producer_outcome = join_task(producer_handle, TaskRole::Producer);
        let consumer_outcome = join_task(consumer_handle, TaskRole::Consumer);
        Ok((producer_outcome?, consumer_outcome?))
    }

    fn verify(&self, expected: usize, produced: u64, consumed: u64) {
        let source = self.source.present();
        let destination = self.destination_container();

        if source == destination {
            info!("Verification: SUCCESS - All items transferred correctly!");
        } else {
            error!(
                "Verification: FAILED - Items mismatch (source {} items, destination {} items)",
                source.len(),
                destination.len()
            );
        }

        let expected = expected as u64;
        if produced != expected || consumed != expected {
            error!(
                "Counter mismatch: expected {}, produced {}, consumed {}",
                expected, produced, consumed
            );
        }
    }
}

fn join_task(handle: JoinHandle<QueueResult<u64>>, task: TaskRole) -> PipelineResult<QueueResult<u64>> {
    handle.join().map_err(|_| {
        error!("The {} thread panicked", task);
        PipelineError::TaskPanicked { task }
    })
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("strategy", &self.strategy())
            .field("capacity", &self.capacity)
            .field("source_len", &self.source.len())
            .field("delays", &self.delays)
            .field("sink", &self.sink.name())
            .finish()
    }
}

//! Bounded-buffer producer/consumer pipeline.
//!
//! One producer thread moves a source sequence through a capacity-bounded
//! queue to one consumer thread, which appends to a destination. Two queue
//! strategies are available: a ready-made blocking channel and a hand-built
//! mutex/condition-variable buffer. Each run is verified and summarised in
//! an [`AnalysisReport`].
//!
//! ```no_run
//! use prodcon::{Pipeline, QueueStrategy};
//!
//! let mut pipeline = Pipeline::with_strategy(5, QueueStrategy::ConditionGated)?;
//! let report = pipeline.run(20)?;
//! assert!(report.integrity_passed());
//! # Ok::<(), prodcon::PipelineError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod queue;
pub mod stats;
pub mod version;

pub use config::{AppConfig, PipelineConfig};
pub use error::{PipelineError, PipelineResult, TaskRole};
pub use pipeline::{CancelHandle, Pipeline, TaskDelays};
pub use queue::{BoundedQueue, QueueError, QueueStrategy};
pub use stats::{AnalysisReport, StatsSnapshot};

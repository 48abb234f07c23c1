//! Producer/Consumer Pipeline
//!
//! One producer thread and one consumer thread share a single
//! [`BoundedQueue`](crate::queue::BoundedQueue). The [`Pipeline`] orchestrator
//! owns the source, destination, statistics and queue, runs both tasks to
//! completion, verifies the transfer and hands the resulting report to a
//! [`ReportSink`](crate::output::ReportSink).

pub mod cancel;
pub mod consumer;
pub mod orchestrator;
pub mod producer;
pub mod source;

use std::time::Duration;

pub use cancel::{CancelHandle, CancellationToken};
pub use consumer::Consumer;
pub use orchestrator::Pipeline;
pub use producer::Producer;
pub use source::SourceSequence;

/// Simulated per-item cost on each side of the hand-off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskDelays {
    pub production: Duration,
    pub consumption: Duration,
}

impl TaskDelays {
    pub fn new(production: Duration, consumption: Duration) -> Self {
        Self {
            production,
            consumption,
        }
    }

    /// No simulated cost on either side
    pub fn none() -> Self {
        Self::default()
    }
}

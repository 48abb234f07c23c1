//! Pipeline Error Types
//!
//! Errors surfaced by the orchestrator. Integrity mismatches are deliberately
//! absent: they are reported as data in [`AnalysisReport`](crate::stats::AnalysisReport).

use thiserror::Error;

use crate::queue::QueueError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Which side of the hand-off an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    Producer,
    Consumer,
}

impl std::fmt::Display for TaskRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskRole::Producer => f.write_str("producer"),
            TaskRole::Consumer => f.write_str("consumer"),
        }
    }
}

/// Errors that can occur while configuring or running a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid capacity, item count or source; nothing was mutated
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A blocking wait was interrupted; partial results are retained
    #[error("The {task} task was cancelled")]
    Cancelled { task: TaskRole },

    /// A task thread panicked and could not be joined cleanly
    #[error("The {task} task panicked")]
    TaskPanicked { task: TaskRole },

    /// Failed to spawn a task thread
    #[error("Failed to spawn the {task} task: {source}")]
    Spawn {
        task: TaskRole,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Lift a queue error raised inside `task`
    pub fn from_queue(error: QueueError, task: TaskRole) -> Self {
        match error {
            QueueError::Cancelled => Self::Cancelled { task },
            QueueError::InvalidCapacity { .. } => Self::configuration(error.to_string()),
        }
    }

    /// Whether this error is a cancellation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

//! Queue Error Types
//!
//! Defines error types specific to bounded queue operations.

use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors that can occur during queue operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Queue was constructed without room for a single item
    #[error("Queue capacity must be greater than 0 (got {capacity})")]
    InvalidCapacity { capacity: usize },

    /// A blocking put/take was interrupted by cancellation
    #[error("Queue operation cancelled")]
    Cancelled,
}

impl QueueError {
    /// Create an invalid capacity error
    pub fn invalid_capacity(capacity: usize) -> Self {
        Self::InvalidCapacity { capacity }
    }

    /// Whether this error stems from cancellation rather than misuse
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

//! Bounded Queue System for Producer/Consumer Hand-off
//!
//! This module provides the capacity-bounded FIFO shared between exactly one
//! producer task and one consumer task. Two strategies implement the same
//! [`BoundedQueue`] contract so that every caller, and every test, can run
//! against either of them:
//!
//! - **NativeBlockingQueue**: wraps a ready-made bounded channel whose send and
//!   receive already block; synchronisation is implicit.
//! - **ConditionGatedQueue**: a plain `VecDeque` guarded by one mutex with
//!   "space available" / "item available" condition variables and a
//!   "producer finished" flag; synchronisation is explicit wait/notify.
//!
//! # Usage
//!
//! ```rust
//! use prodcon::queue::{QueueStrategy, BoundedQueue};
//!
//! let queue = QueueStrategy::ConditionGated.build::<i64>(2).unwrap();
//! assert_eq!(queue.put(1).unwrap(), 1);
//! assert_eq!(queue.put(2).unwrap(), 2);
//! queue.finish();
//!
//! assert_eq!(queue.take().unwrap(), Some(1));
//! assert_eq!(queue.take().unwrap(), Some(2));
//! assert_eq!(queue.take().unwrap(), None);
//! ```

pub mod condition;
pub mod error;
pub mod native;

#[cfg(test)]
pub(crate) mod mock;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use condition::{BufferState, ConditionGatedQueue};
pub use error::{QueueError, QueueResult};
pub use native::NativeBlockingQueue;

/// Capacity-bounded FIFO hand-off between one producer and one consumer.
///
/// Implementations never drop or reorder items and never partially enqueue
/// or dequeue one. `0 <= depth() <= capacity()` holds at every observable
/// instant.
pub trait BoundedQueue<T>: Send + Sync {
    /// Append `item` at the tail, blocking while the queue is full.
    ///
    /// Returns the queue depth observed immediately after the insertion.
    fn put(&self, item: T) -> QueueResult<usize>;

    /// Remove the head, blocking while the queue is empty.
    ///
    /// Returns `Ok(None)` once the producer has called [`finish`](Self::finish)
    /// and every item has been drained.
    fn take(&self) -> QueueResult<Option<T>>;

    /// Number of items currently buffered
    fn depth(&self) -> usize;

    /// Maximum number of buffered items
    fn capacity(&self) -> usize;

    /// Signal that no further items will be put
    fn finish(&self);

    /// Wake every blocked caller; subsequent put/take calls fail with
    /// [`QueueError::Cancelled`] until [`reset`](Self::reset).
    fn cancel(&self);

    /// Whether [`cancel`](Self::cancel) has been called since the last reset
    fn is_cancelled(&self) -> bool;

    /// Discard buffered items and clear the finished/cancelled signals
    fn reset(&self);

    /// The synchronisation strategy backing this queue
    fn strategy(&self) -> QueueStrategy;
}

/// Selectable synchronisation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueStrategy {
    /// Ready-made bounded blocking channel
    NativeBlocking,
    /// Mutex + condition variables (wait/notify)
    ConditionGated,
}

impl QueueStrategy {
    /// All strategies, in a stable order
    pub const ALL: [QueueStrategy; 2] = [QueueStrategy::NativeBlocking, QueueStrategy::ConditionGated];

    /// Build a queue of this strategy with the given capacity
    pub fn build<T: Send + 'static>(self, capacity: usize) -> QueueResult<Arc<dyn BoundedQueue<T>>> {
        let queue: Arc<dyn BoundedQueue<T>> = match self {
            QueueStrategy::NativeBlocking => Arc::new(NativeBlockingQueue::new(capacity)?),
            QueueStrategy::ConditionGated => Arc::new(ConditionGatedQueue::new(capacity)?),
        };
        Ok(queue)
    }

    /// Stable identifier used in configuration and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStrategy::NativeBlocking => "native-blocking",
            QueueStrategy::ConditionGated => "condition-gated",
        }
    }

    /// Short description of how the strategy synchronises
    pub fn mechanism(&self) -> &'static str {
        match self {
            QueueStrategy::NativeBlocking => "Blocking channel (implicit synchronization)",
            QueueStrategy::ConditionGated => "Wait/Notify (explicit synchronization)",
        }
    }
}

impl Default for QueueStrategy {
    fn default() -> Self {
        QueueStrategy::NativeBlocking
    }
}

impl fmt::Display for QueueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" | "native-blocking" | "blocking" => Ok(QueueStrategy::NativeBlocking),
            "condition" | "condition-gated" | "wait-notify" => Ok(QueueStrategy::ConditionGated),
            _ => Err(format!(
                "Invalid queue strategy: {}. Valid options: native, condition",
                s
            )),
        }
    }
}

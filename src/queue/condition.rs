//! Condition-Gated Queue
//!
//! Explicit wait/notify implementation of [`BoundedQueue`]. One mutex guards
//! the buffered items together with the `finished` and `cancelled` flags; two
//! condition variables carry the "space available" and "item available"
//! signals.
//!
//! The queue moves through the states {Empty, Partial, Full} × {producing,
//! finished}. `put` and `take` drive the transitions and the terminal state is
//! reached once the producer has finished and the buffer is drained, at which
//! point `take` returns `Ok(None)` instead of waiting forever.

use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::collections::VecDeque;

use crate::queue::{BoundedQueue, QueueError, QueueResult, QueueStrategy};

/// Fill level of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BufferState {
    Empty,
    Partial,
    Full,
}

impl BufferState {
    fn classify(depth: usize, capacity: usize) -> Self {
        if depth == 0 {
            BufferState::Empty
        } else if depth >= capacity {
            BufferState::Full
        } else {
            BufferState::Partial
        }
    }
}

#[derive(Debug)]
struct GateState<T> {
    items: VecDeque<T>,
    finished: bool,
    cancelled: bool,
}

/// Bounded FIFO synchronised with a mutex and two condition variables
#[derive(Debug)]
pub struct ConditionGatedQueue<T> {
    state: Mutex<GateState<T>>,
    space_available: Condvar,
    item_available: Condvar,
    capacity: usize,
}

impl<T> ConditionGatedQueue<T> {
    /// Create a queue holding at most `capacity` items
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::invalid_capacity(capacity));
        }

        Ok(Self {
            state: Mutex::new(GateState {
                items: VecDeque::with_capacity(capacity),
                finished: false,
                cancelled: false,
            }),
            space_available: Condvar::new(),
            item_available: Condvar::new(),
            capacity,
        })
    }

    /// Current fill level
    pub fn buffer_state(&self) -> BufferState {
        let state = self.state.lock();
        BufferState::classify(state.items.len(), self.capacity)
    }

    /// Whether the producer has signalled completion
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Finished and drained: `take` will never yield another item
    pub fn is_terminal(&self) -> bool {
        let state = self.state.lock();
        state.finished && state.items.is_empty()
    }
}

impl<T: Send> BoundedQueue<T> for ConditionGatedQueue<T> {
    fn put(&self, item: T) -> QueueResult<usize> {
        let mut state = self.state.lock();
        while state.items.len() >= self.capacity && !state.cancelled {
            log::debug!("Queue is full. Producer waiting...");
            self.space_available.wait(&mut state);
        }
        if state.cancelled {
            return Err(QueueError::Cancelled);
        }

        state.items.push_back(item);
        let depth = state.items.len();
        self.item_available.notify_one();
        Ok(depth)
    }

    fn take(&self) -> QueueResult<Option<T>> {
        let mut state = self.state.lock();
        while state.items.is_empty() && !state.finished && !state.cancelled {
            log::debug!("Queue is empty. Consumer waiting...");
            self.item_available.wait(&mut state);
        }
        if state.cancelled {
            return Err(QueueError::Cancelled);
        }

        match state.items.pop_front() {
            Some(item) => {
                self.space_available.notify_one();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn depth(&self) -> usize {
        self.state.lock().items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn finish(&self) {
        let mut state = self.state.lock();
        state.finished = true;
        log::debug!("Condition queue: producer finished with {} items buffered", state.items.len());
        self.item_available.notify_all();
    }

    fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        log::debug!("Condition queue: cancelled");
        self.item_available.notify_all();
        self.space_available.notify_all();
    }

    fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.items.clear();
        state.finished = false;
        state.cancelled = false;
    }

    fn strategy(&self) -> QueueStrategy {
        QueueStrategy::ConditionGated
    }
}

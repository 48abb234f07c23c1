//! Mock Queue Implementation for Testing
//!
//! Wraps a real queue and panics on a chosen operation, so the task guards
//! that run during unwinding can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::queue::{BoundedQueue, QueueResult, QueueStrategy};

/// Operation that panics instead of reaching the wrapped queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    PanicOnPut,
    PanicOnTake,
}

/// Queue that delegates to `inner` except for the faulty operation
pub struct FaultyQueue {
    inner: Arc<dyn BoundedQueue<i64>>,
    fault: Fault,
    finish_called: AtomicBool,
    cancel_called: AtomicBool,
}

impl FaultyQueue {
    pub fn new(inner: Arc<dyn BoundedQueue<i64>>, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            finish_called: AtomicBool::new(false),
            cancel_called: AtomicBool::new(false),
        }
    }

    pub fn finish_called(&self) -> bool {
        self.finish_called.load(Ordering::SeqCst)
    }

    pub fn cancel_called(&self) -> bool {
        self.cancel_called.load(Ordering::SeqCst)
    }
}

impl BoundedQueue<i64> for FaultyQueue {
    fn put(&self, item: i64) -> QueueResult<usize> {
        if self.fault == Fault::PanicOnPut {
            panic!("injected put failure");
        }
        self.inner.put(item)
    }

    fn take(&self) -> QueueResult<Option<i64>> {
        if self.fault == Fault::PanicOnTake {
            panic!("injected take failure");
        }
        self.inner.take()
    }

    fn depth(&self) -> usize {
        self.inner.depth()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn finish(&self) {
        self.finish_called.store(true, Ordering::SeqCst);
        self.inner.finish();
    }

    fn cancel(&self) {
        self.cancel_called.store(true, Ordering::SeqCst);
        self.inner.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    fn reset(&self) {
        self.inner.reset();
    }

    fn strategy(&self) -> QueueStrategy {
        self.inner.strategy()
    }
}

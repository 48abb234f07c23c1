//! Run cancellation
//!
//! A [`CancellationToken`] interrupts the inter-item delays of both tasks; a
//! [`CancelHandle`] pairs it with the queue so that a single call also wakes
//! any task blocked inside `put` or `take`.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::queue::BoundedQueue;

/// Cancellation flag with an interruptible sleep
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every sleeper
    pub fn cancel(&self) {
        let mut cancelled = self.cancelled.lock();
        *cancelled = true;
        self.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }

    /// Clear the flag for the next run
    pub fn reset(&self) {
        *self.cancelled.lock() = false;
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` if the token was (or became) cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self.cancelled.lock();
        while !*cancelled {
            if self.wake.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

/// Cloneable handle that cancels an in-flight run from another thread
#[derive(Clone)]
pub struct CancelHandle {
    token: Arc<CancellationToken>,
    queue: Arc<dyn BoundedQueue<i64>>,
}

impl CancelHandle {
    pub(crate) fn new(token: Arc<CancellationToken>, queue: Arc<dyn BoundedQueue<i64>>) -> Self {
        Self { token, queue }
    }

    /// Interrupt both tasks at their next wait or delay
    pub fn cancel(&self) {
        log::info!("Cancellation requested");
        self.token.cancel();
        self.queue.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .field("strategy", &self.queue.strategy())
            .finish()
    }
}

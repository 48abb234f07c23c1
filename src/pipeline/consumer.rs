//! Consumer Task
//!
//! Drains the bounded queue into the destination sequence, timing its own
//! blocking inside `take`.

use log::{debug, info, trace, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pipeline::cancel::CancellationToken;
use crate::queue::{BoundedQueue, QueueError, QueueResult};
use crate::stats::PipelineStats;

/// Cancels the queue if the consumer unwinds, so a producer blocked on a
/// full queue is released instead of waiting forever.
struct CancelOnPanic<'a>(&'a dyn BoundedQueue<i64>);

impl Drop for CancelOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.cancel();
        }
    }
}

/// Consumer side of the hand-off
pub struct Consumer {
    queue: Arc<dyn BoundedQueue<i64>>,
    stats: Arc<PipelineStats>,
    token: Arc<CancellationToken>,
    destination: Arc<Mutex<Vec<i64>>>,
    delay: Duration,
}

impl Consumer {
    pub fn new(
        queue: Arc<dyn BoundedQueue<i64>>,
        stats: Arc<PipelineStats>,
        token: Arc<CancellationToken>,
        destination: Arc<Mutex<Vec<i64>>>,
        delay: Duration,
    ) -> Self {
        Self {
            queue,
            stats,
            token,
            destination,
            delay,
        }
    }

    /// Take items until `expected` have been consumed or the queue reports
    /// that the producer finished.
    ///
    /// Returns the number of items appended to the destination.
    pub fn run(&self, expected: usize) -> QueueResult<u64> {
        let _guard = CancelOnPanic(self.queue.as_ref());

        if expected == 0 {
            info!("Consumer: no items to consume");
            return Ok(0);
        }

        let mut consumed = 0usize;
        while consumed < expected {
            if self.token.is_cancelled() {
                debug!("Consumer: cancelled after {} items", consumed);
                return Err(QueueError::Cancelled);
            }

            let started = Instant::now();
            let outcome = self.queue.take();
            self.stats.add_consumer_wait(started.elapsed());

            let Some(item) = outcome? else {
                warn!(
                    "Consumer: producer finished after {} of {} expected items",
                    consumed, expected
                );
                break;
            };

            let depth = self.queue.depth();
            self.destination.lock().push(item);
            self.stats.record_consumed();
            consumed += 1;
            trace!(
                "Consumer consumed: {} | Queue depth: {} | Total consumed: {}",
                item, depth, consumed
            );

            if !self.delay.is_zero() && self.token.sleep(self.delay) {
                debug!("Consumer: cancelled during consumption delay after {} items", consumed);
                return Err(QueueError::Cancelled);
            }
        }

        info!("Consumer finished consuming {} items", consumed);
        Ok(consumed as u64)
    }
}

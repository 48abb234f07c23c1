//! Producer Task
//!
//! Drains the source sequence into the bounded queue in order, timing its own
//! blocking inside `put`.

use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pipeline::cancel::CancellationToken;
use crate::queue::{BoundedQueue, QueueError, QueueResult};
use crate::stats::PipelineStats;

/// Signals `finish` on the queue when dropped, including during unwinding,
/// so a waiting consumer always observes termination.
struct FinishOnDrop<'a>(&'a dyn BoundedQueue<i64>);

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Producer side of the hand-off
pub struct Producer {
    queue: Arc<dyn BoundedQueue<i64>>,
    stats: Arc<PipelineStats>,
    token: Arc<CancellationToken>,
    delay: Duration,
}

impl Producer {
    pub fn new(
        queue: Arc<dyn BoundedQueue<i64>>,
        stats: Arc<PipelineStats>,
        token: Arc<CancellationToken>,
        delay: Duration,
    ) -> Self {
        Self {
            queue,
            stats,
            token,
            delay,
        }
    }

    /// Put every present entry of `source`, then signal completion.
    ///
    /// Returns the number of items put. On cancellation the items already
    /// put stay counted.
    pub fn run(&self, source: &[Option<i64>]) -> QueueResult<u64> {
        let _finish = FinishOnDrop(self.queue.as_ref());

        if source.is_empty() {
            info!("Producer: source is empty, nothing to produce");
            return Ok(0);
        }

        let produced = self.produce_all(source)?;
        info!("Producer finished producing {} items", produced);
        Ok(produced)
    }

    fn produce_all(&self, source: &[Option<i64>]) -> QueueResult<u64> {
        let mut produced = 0u64;

        for (position, entry) in source.iter().enumerate() {
            if self.token.is_cancelled() {
                debug!("Producer: cancelled after {} items", produced);
                return Err(QueueError::Cancelled);
            }

            let Some(item) = *entry else {
                warn!("Producer: absent item at position {}, skipping", position);
                self.stats.record_skipped();
                continue;
            };

            let started = Instant::now();
            let outcome = self.queue.put(item);
            self.stats.add_producer_wait(started.elapsed());

            let depth = outcome?;
            self.stats.record_produced(depth);
            produced += 1;
            trace!("Producer produced: {} | Queue depth: {}", item, depth);

            if !self.delay.is_zero() && self.token.sleep(self.delay) {
                debug!("Producer: cancelled during production delay after {} items", produced);
                return Err(QueueError::Cancelled);
            }
        }

        Ok(produced)
    }
}

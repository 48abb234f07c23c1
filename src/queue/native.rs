//! Native Blocking Queue
//!
//! Bounded queue backed by a `crossbeam_channel` bounded channel. The channel
//! already blocks senders while full and receivers while empty, so this type
//! only layers the finished and cancelled signals on top of it.

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::Mutex;

use crate::queue::{BoundedQueue, QueueError, QueueResult, QueueStrategy};

/// One-shot signal observable from `select!`.
///
/// Tripping drops the sender, which disconnects every receiver clone and
/// makes a pending `recv` on it complete immediately.
#[derive(Debug)]
struct Latch {
    sender: Mutex<Option<Sender<()>>>,
    receiver: Mutex<Receiver<()>>,
}

impl Latch {
    fn new() -> Self {
        let (sender, receiver) = bounded(0);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
        }
    }

    fn trip(&self) {
        self.sender.lock().take();
    }

    fn is_tripped(&self) -> bool {
        self.sender.lock().is_none()
    }

    fn watch(&self) -> Receiver<()> {
        self.receiver.lock().clone()
    }

    fn rearm(&self) {
        let (sender, receiver) = bounded(0);
        *self.receiver.lock() = receiver;
        *self.sender.lock() = Some(sender);
    }
}

/// Bounded FIFO whose blocking is provided by the channel implementation
#[derive(Debug)]
pub struct NativeBlockingQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
    finished: Latch,
    cancelled: Latch,
}

impl<T> NativeBlockingQueue<T> {
    /// Create a queue holding at most `capacity` items
    pub fn new(capacity: usize) -> QueueResult<Self> {
        // A zero-capacity crossbeam channel is a rendezvous, not a buffer.
        if capacity == 0 {
            return Err(QueueError::invalid_capacity(capacity));
        }

        let (sender, receiver) = bounded(capacity);
        Ok(Self {
            sender,
            receiver,
            capacity,
            finished: Latch::new(),
            cancelled: Latch::new(),
        })
    }

    /// Whether the producer has signalled completion
    pub fn is_finished(&self) -> bool {
        self.finished.is_tripped()
    }
}

impl<T: Send> BoundedQueue<T> for NativeBlockingQueue<T> {
    fn put(&self, item: T) -> QueueResult<usize> {
        if self.cancelled.is_tripped() {
            return Err(QueueError::Cancelled);
        }

        let cancelled = self.cancelled.watch();
        select! {
            send(self.sender, item) -> sent => {
                // Only fails once every receiver is gone; we own one.
                sent.map_err(|_| QueueError::Cancelled)?;
                // The consumer may already have taken the item; it was still buffered at insertion.
                Ok(self.sender.len().max(1))
            }
            recv(cancelled) -> _ => Err(QueueError::Cancelled),
        }
    }

    fn take(&self) -> QueueResult<Option<T>> {
        if self.cancelled.is_tripped() {
            return Err(QueueError::Cancelled);
        }

        let cancelled = self.cancelled.watch();
        let finished = self.finished.watch();
        select! {
            recv(self.receiver) -> item => item.map(Some).map_err(|_| QueueError::Cancelled),
            recv(finished) -> _ => {
                // Every put completed before finish(), so whatever is still
                // buffered is the tail of the sequence in order.
                Ok(self.receiver.try_recv().ok())
            }
            recv(cancelled) -> _ => Err(QueueError::Cancelled),
        }
    }

    fn depth(&self) -> usize {
        self.receiver.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn finish(&self) {
        log::debug!("Native queue: producer finished");
        self.finished.trip();
    }

    fn cancel(&self) {
        log::debug!("Native queue: cancelled");
        self.cancelled.trip();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.is_tripped()
    }

    fn reset(&self) {
        let mut drained = 0usize;
        while self.receiver.try_recv().is_ok() {
            drained += 1;
        }
        if drained > 0 {
            log::debug!("Native queue: discarded {} buffered items on reset", drained);
        }
        self.finished.rearm();
        self.cancelled.rearm();
    }

    fn strategy(&self) -> QueueStrategy {
        QueueStrategy::NativeBlocking
    }
}

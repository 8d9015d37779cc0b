//! The queue together with the three semaphores that coordinate it.

use foundation_sync::{SemaphoreMutex, SemaphoreMutexGuard, TimedSemaphore};

use crate::queue::RingQueue;

/// Shared by every worker of one pipeline, usually behind an `Arc`.
///
/// - `queue`: the ring, reachable only while its binary semaphore is held.
/// - `empty_slots`: one permit per free slot; producers take one before
///   enqueueing, consumers return one after dequeueing.
/// - `full_slots`: one permit per queued job; consumers take one before
///   dequeueing, producers return one after enqueueing.
///
/// The two counting semaphores let workers learn whether they may proceed
/// without touching the queue lock.
#[derive(Debug)]
pub struct JobBuffer {
    capacity: usize,
    queue: SemaphoreMutex<RingQueue>,
    empty_slots: TimedSemaphore,
    full_slots: TimedSemaphore,
}

impl JobBuffer {
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: SemaphoreMutex::new(RingQueue::new(capacity)),
            empty_slots: TimedSemaphore::new(capacity),
            full_slots: TimedSemaphore::new(0),
        }
    }

    /// Takes the queue's mutual-exclusion permit.
    pub fn lock(&self) -> SemaphoreMutexGuard<'_, RingQueue> {
        self.queue.lock()
    }

    #[must_use]
    pub fn empty_slots(&self) -> &TimedSemaphore {
        &self.empty_slots
    }

    #[must_use]
    pub fn full_slots(&self) -> &TimedSemaphore {
        &self.full_slots
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

//! Fixed-capacity ring of [`Job`]s.
//!
//! The ring is tracked with a `head` index and a `len` counter; the rear
//! slot is derived as `(head + len - 1) % capacity`. There is no sentinel
//! state: an empty ring is simply `len == 0`.
//!
//! `RingQueue` has no interior synchronization. Every mutator takes
//! `&mut self`, and the pipeline only reaches it through a
//! [`foundation_sync::SemaphoreMutex`].

use crate::errors::{QueueError, QueueResult};
use crate::job::Job;

#[derive(Debug)]
pub struct RingQueue {
    slots: Box<[Option<Job>]>,
    head: usize,
    len: usize,

    high_water: usize,
    enqueued: u64,
    dequeued: u64,
}

impl RingQueue {
    /// Creates an empty ring.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingQueue capacity must be > 0");

        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            high_water: 0,
            enqueued: 0,
            dequeued: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Largest number of jobs ever held at once.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    #[must_use]
    pub fn enqueued_total(&self) -> u64 {
        self.enqueued
    }

    #[must_use]
    pub fn dequeued_total(&self) -> u64 {
        self.dequeued
    }

    /// Slot index of the oldest job, if any.
    #[must_use]
    pub fn front(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.head)
    }

    /// Slot index of the newest job, if any.
    #[must_use]
    pub fn rear(&self) -> Option<usize> {
        (!self.is_empty()).then(|| (self.head + self.len - 1) % self.capacity())
    }

    /// Appends `job` at the rear, stamping it with its slot index and
    /// enqueue ticket, and returns the stored job.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if every slot is taken. Callers that
    /// reserve a slot through `empty_slots` first never see this.
    pub fn enqueue(&mut self, mut job: Job) -> QueueResult<&Job> {
        if self.is_full() {
            return Err(QueueError::Full {
                capacity: self.capacity(),
            });
        }

        let slot = (self.head + self.len) % self.capacity();
        job.id = slot;
        job.ticket = self.enqueued;

        self.enqueued += 1;
        self.len += 1;
        self.high_water = self.high_water.max(self.len);

        Ok(&*self.slots[slot].insert(job))
    }

    /// Removes and returns the job at the front, clearing its slot.
    ///
    /// Returns `None` on an empty ring. Callers that reserve an item
    /// through `full_slots` first never see this.
    pub fn dequeue(&mut self) -> Option<Job> {
        if self.is_empty() {
            return None;
        }

        let job = self.slots[self.head].take();
        debug_assert!(job.is_some(), "occupied slot {} was empty", self.head);

        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        self.dequeued += 1;

        job
    }
}

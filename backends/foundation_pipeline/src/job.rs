use std::time::Duration;

/// Identifies a producer or consumer; ids start at 1 within each role.
pub type WorkerId = usize;

/// A unit of simulated work.
///
/// `id` and `ticket` are placeholders until [`crate::RingQueue::enqueue`]
/// stamps them: `id` becomes the slot the job landed in and `ticket` the
/// number of jobs enqueued before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: usize,
    /// Simulated cost, in time units.
    pub duration: u32,
    pub producer: WorkerId,
    pub ticket: u64,
}

impl Job {
    #[must_use]
    pub const fn new(producer: WorkerId, duration: u32) -> Self {
        Self {
            id: 0,
            duration,
            producer,
            ticket: 0,
        }
    }

    /// Wall-clock time the job takes when one time unit lasts `unit`.
    #[must_use]
    pub fn cost(&self, unit: Duration) -> Duration {
        unit.saturating_mul(self.duration)
    }
}

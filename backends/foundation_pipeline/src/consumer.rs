//! Consumer worker.
//!
//! ```text
//! WaitingForItem -> Extracting -> Executing -> WaitingForItem
//!       |
//!       +-> Retiring (timed out)
//! ```
//!
//! The idle timeout is the only way out of the loop, so a consumer always
//! outlives the last job it sees by one full timeout.

use std::sync::Arc;
use std::thread;

use crate::buffer::JobBuffer;
use crate::config::Timing;
use crate::errors::{PipelineError, PipelineResult};
use crate::job::WorkerId;
use crate::report::{ConsumerExit, ConsumerSummary};

/// Pulls jobs from a shared [`JobBuffer`] and sleeps through each one.
pub struct Consumer {
    id: WorkerId,
    timing: Timing,
    buffer: Arc<JobBuffer>,
}

impl Consumer {
    #[must_use]
    pub fn new(id: WorkerId, timing: Timing, buffer: Arc<JobBuffer>) -> Self {
        Self { id, timing, buffer }
    }

    #[must_use]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Runs until no job arrives within the idle timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::QueueUnderflow`] if `full_slots` granted a
    /// permit while the queue was empty.
    pub fn run(self) -> PipelineResult<ConsumerSummary> {
        let mut consumed = Vec::new();

        loop {
            if self
                .buffer
                .full_slots()
                .timed_wait(self.timing.idle_timeout())
                .is_timeout()
            {
                tracing::info!(consumer = self.id, "no more jobs left, retiring");
                return Ok(ConsumerSummary {
                    id: self.id,
                    consumed,
                    exit: ConsumerExit::Idle,
                });
            }

            let job = {
                let mut queue = self.buffer.lock();
                let job = queue
                    .dequeue()
                    .ok_or(PipelineError::QueueUnderflow(self.id))?;
                tracing::info!(
                    consumer = self.id,
                    job = job.id,
                    duration = job.duration,
                    ticket = job.ticket,
                    "job executing"
                );
                job
            };
            self.buffer.empty_slots().signal();

            thread::sleep(job.cost(self.timing.get_unit()));
            tracing::info!(consumer = self.id, job = job.id, "job completed");

            consumed.push(job);
        }
    }
}

//! Producer worker.
//!
//! ```text
//! Producing -> WaitingForSlot -> Depositing -> Idle -> Producing
//!                    |                            |
//!                    +-> Retiring (timed out)     +-> Finished (quota done)
//! ```

use std::sync::Arc;
use std::thread;

use rand::{rngs::StdRng, SeedableRng};

use crate::buffer::JobBuffer;
use crate::config::Timing;
use crate::errors::PipelineResult;
use crate::job::{Job, WorkerId};
use crate::report::{ProducerExit, ProducerSummary};

/// Generates `quota` jobs into a shared [`JobBuffer`].
pub struct Producer {
    id: WorkerId,
    quota: usize,
    timing: Timing,
    rng: StdRng,
    buffer: Arc<JobBuffer>,
}

impl Producer {
    /// With a `seed`, job durations and pauses are reproducible.
    #[must_use]
    pub fn new(
        id: WorkerId,
        quota: usize,
        timing: Timing,
        seed: Option<u64>,
        buffer: Arc<JobBuffer>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            id,
            quota,
            timing,
            rng,
            buffer,
        }
    }

    #[must_use]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Runs until the quota is met or no slot frees up within the idle
    /// timeout. Either way is a normal exit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::Queue`] if the queue refuses a job
    /// after a slot was reserved for it.
    pub fn run(mut self) -> PipelineResult<ProducerSummary> {
        let mut produced = Vec::new();
        let mut remaining = self.quota;

        while remaining > 0 {
            let duration = self.timing.get_job_duration().sample(&mut self.rng);
            let job = Job::new(self.id, duration);

            if self
                .buffer
                .empty_slots()
                .timed_wait(self.timing.idle_timeout())
                .is_timeout()
            {
                tracing::info!(producer = self.id, "no more space in queue, retiring");
                return Ok(ProducerSummary {
                    id: self.id,
                    produced,
                    exit: ProducerExit::QueueFull,
                });
            }

            let job = {
                let mut queue = self.buffer.lock();
                let job = queue.enqueue(job)?;
                tracing::info!(
                    producer = self.id,
                    job = job.id,
                    duration = job.duration,
                    ticket = job.ticket,
                    "job produced"
                );
                job.clone()
            };
            remaining -= 1;
            produced.push(job);

            self.buffer.full_slots().signal();

            let pause = self.timing.get_production_interval().sample(&mut self.rng);
            thread::sleep(self.timing.units(pause));
        }

        tracing::info!(producer = self.id, "no more jobs to generate");
        Ok(ProducerSummary {
            id: self.id,
            produced,
            exit: ProducerExit::QuotaExhausted,
        })
    }
}

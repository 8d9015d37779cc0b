//! Orchestrates one run: builds the buffer, spawns one OS thread per
//! worker, joins them all and reports.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::buffer::JobBuffer;
use crate::config::PipelineConfig;
use crate::consumer::Consumer;
use crate::errors::{PipelineError, PipelineResult, WorkerRole};
use crate::job::WorkerId;
use crate::producer::Producer;
use crate::report::PipelineReport;

type WorkerHandle<T> = (WorkerId, JoinHandle<PipelineResult<T>>);

/// A validated pipeline ready to [`run`](Pipeline::run).
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` cannot be run.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every worker to completion and reports what happened.
    ///
    /// Producers are numbered `1..=producers` and consumers `1..=consumers`.
    /// Producers are joined first, then consumers.
    ///
    /// # Errors
    ///
    /// Fails on the first spawn error, worker panic or worker fault. Threads
    /// already running are detached, not stopped; they end on their own
    /// idle timeouts.
    pub fn run(self) -> PipelineResult<PipelineReport> {
        let started = Instant::now();
        let timing = self.config.get_timing();
        let buffer = Arc::new(JobBuffer::new(self.config.get_capacity()));

        tracing::debug!(
            capacity = self.config.get_capacity(),
            producers = self.config.get_producer_count(),
            consumers = self.config.get_consumer_count(),
            jobs_per_producer = self.config.get_jobs_per_producer(),
            "starting pipeline"
        );

        let mut producer_handles = Vec::with_capacity(self.config.get_producer_count());
        for id in 1..=self.config.get_producer_count() {
            let seed = self
                .config
                .get_seed()
                .map(|seed| seed.wrapping_add(id as u64));
            let producer = Producer::new(
                id,
                self.config.get_jobs_per_producer(),
                timing,
                seed,
                Arc::clone(&buffer),
            );
            producer_handles.push(spawn_worker(WorkerRole::Producer, id, move || {
                producer.run()
            })?);
        }

        let mut consumer_handles = Vec::with_capacity(self.config.get_consumer_count());
        for id in 1..=self.config.get_consumer_count() {
            let consumer = Consumer::new(id, timing, Arc::clone(&buffer));
            consumer_handles.push(spawn_worker(WorkerRole::Consumer, id, move || {
                consumer.run()
            })?);
        }

        let producers = join_workers(WorkerRole::Producer, producer_handles)?;
        let consumers = join_workers(WorkerRole::Consumer, consumer_handles)?;

        let (high_water, stranded_jobs) = {
            let queue = buffer.lock();
            (queue.high_water(), queue.len())
        };
        drop(buffer);

        if stranded_jobs > 0 {
            tracing::warn!(stranded = stranded_jobs, "jobs left in the queue");
        }

        Ok(PipelineReport {
            producers,
            consumers,
            high_water,
            stranded_jobs,
            elapsed: started.elapsed(),
        })
    }
}

fn spawn_worker<T, F>(role: WorkerRole, id: WorkerId, work: F) -> PipelineResult<WorkerHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> PipelineResult<T> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("{role}-{id}"))
        .spawn(work)
        .map_err(|err| {
            tracing::error!(%role, id, error = %err, "failed to spawn worker");
            PipelineError::Spawn(err)
        })?;

    Ok((id, handle))
}

fn join_workers<T>(role: WorkerRole, handles: Vec<WorkerHandle<T>>) -> PipelineResult<Vec<T>> {
    let mut summaries = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        let summary = handle.join().map_err(|_| {
            tracing::error!(%role, id, "worker panicked");
            PipelineError::WorkerPanicked(role, id)
        })??;
        summaries.push(summary);
    }
    Ok(summaries)
}

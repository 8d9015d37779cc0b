//! A fixed-capacity job queue shared by producer and consumer threads.
//!
//! The queue ([`RingQueue`]) does no locking of its own. Everything around it
//! is composed from three semaphores held by a [`JobBuffer`]:
//!
//! - a binary semaphore guarding the queue itself,
//! - `empty_slots`, counting free slots (starts at the capacity),
//! - `full_slots`, counting queued jobs (starts at zero).
//!
//! Producers and consumers only ever block on these semaphores, and every
//! blocking wait on the counting semaphores carries an idle timeout. A
//! worker whose wait times out assumes no more work is coming and retires.
//!
//! # Examples
//!
//! ```rust,no_run
//! use foundation_pipeline::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new(3)
//!     .jobs_per_producer(2)
//!     .producers(2)
//!     .consumers(1);
//!
//! let report = Pipeline::new(config)?.run()?;
//! assert_eq!(report.jobs_consumed(), 4);
//! # Ok::<(), foundation_pipeline::PipelineError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod job;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod report;

pub use buffer::JobBuffer;
pub use config::{
    ConfigError, ConfigResult, PipelineConfig, PipelineSettings, Timing, TimingSettings, UnitRange,
};
pub use consumer::Consumer;
pub use errors::{PipelineError, PipelineResult, QueueError, QueueResult, WorkerRole};
pub use job::{Job, WorkerId};
pub use pipeline::Pipeline;
pub use producer::Producer;
pub use queue::RingQueue;
pub use report::{ConsumerExit, ConsumerSummary, PipelineReport, ProducerExit, ProducerSummary};

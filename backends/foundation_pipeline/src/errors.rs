use derive_more::From;

use crate::job::WorkerId;

pub type QueueResult<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    Full { capacity: usize },
}

impl std::error::Error for QueueError {}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Producer,
    Consumer,
}

impl core::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerRole::Producer => write!(f, "producer"),
            WorkerRole::Consumer => write!(f, "consumer"),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[derive(From, Debug)]
pub enum PipelineError {
    #[from(ignore)]
    InvalidConfig(&'static str),

    Spawn(std::io::Error),

    #[from(ignore)]
    WorkerPanicked(WorkerRole, WorkerId),

    /// `full_slots` granted a permit but the queue was empty.
    #[from(ignore)]
    QueueUnderflow(WorkerId),

    Queue(QueueError),
}

impl std::error::Error for PipelineError {}

impl core::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

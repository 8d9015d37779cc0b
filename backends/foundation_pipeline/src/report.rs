//! What each worker did during a run, and the run as a whole.

use core::time::Duration;
use std::fmt::Write as _;

use crate::job::{Job, WorkerId};

/// Why a producer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerExit {
    /// Every job of the quota was enqueued.
    QuotaExhausted,
    /// No slot freed up within the idle timeout.
    QueueFull,
}

/// Why a consumer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerExit {
    /// No job arrived within the idle timeout.
    Idle,
}

#[derive(Debug, Clone)]
pub struct ProducerSummary {
    pub id: WorkerId,
    /// Jobs as they were stamped by the queue, in production order.
    pub produced: Vec<Job>,
    pub exit: ProducerExit,
}

#[derive(Debug, Clone)]
pub struct ConsumerSummary {
    pub id: WorkerId,
    /// Jobs in the order this consumer dequeued them.
    pub consumed: Vec<Job>,
    pub exit: ConsumerExit,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub producers: Vec<ProducerSummary>,
    pub consumers: Vec<ConsumerSummary>,
    /// Largest queue occupancy observed.
    pub high_water: usize,
    /// Jobs still queued after every worker stopped.
    pub stranded_jobs: usize,
    pub elapsed: Duration,
}

impl PipelineReport {
    #[must_use]
    pub fn jobs_produced(&self) -> usize {
        self.producers.iter().map(|p| p.produced.len()).sum()
    }

    #[must_use]
    pub fn jobs_consumed(&self) -> usize {
        self.consumers.iter().map(|c| c.consumed.len()).sum()
    }

    /// Tickets of every consumed job, sorted ascending.
    #[must_use]
    pub fn consumed_tickets(&self) -> Vec<u64> {
        let mut tickets: Vec<u64> = self
            .consumers
            .iter()
            .flat_map(|c| c.consumed.iter().map(|job| job.ticket))
            .collect();
        tickets.sort_unstable();
        tickets
    }

    /// Generates a human-readable summary.
    #[must_use]
    pub fn to_string_pretty(&self) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "=== Pipeline Report ===");
        let _ = writeln!(report, "Jobs produced: {}", self.jobs_produced());
        let _ = writeln!(report, "Jobs consumed: {}", self.jobs_consumed());
        let _ = writeln!(report, "Jobs stranded: {}", self.stranded_jobs);
        let _ = writeln!(report, "Queue high water: {}", self.high_water);
        let _ = writeln!(report, "Elapsed: {:?}", self.elapsed);

        if !self.producers.is_empty() {
            report.push_str("\nProducers:\n");
            for producer in &self.producers {
                let _ = writeln!(
                    report,
                    "  Producer({}): {} jobs, {:?}",
                    producer.id,
                    producer.produced.len(),
                    producer.exit
                );
            }
        }

        if !self.consumers.is_empty() {
            report.push_str("\nConsumers:\n");
            for consumer in &self.consumers {
                let _ = writeln!(
                    report,
                    "  Consumer({}): {} jobs, {:?}",
                    consumer.id,
                    consumer.consumed.len(),
                    consumer.exit
                );
            }
        }

        report
    }
}

impl core::fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_pretty())
    }
}

//! End-to-end pipeline runs with a shrunken time unit.

use std::thread;
use std::time::Duration;

use foundation_pipeline::{
    ConsumerExit, Pipeline, PipelineConfig, PipelineReport, ProducerExit, Timing,
};
use serial_test::serial;

fn fast_timing() -> Timing {
    Timing::new()
        .unit(Duration::from_millis(2))
        .idle_timeout_units(50)
}

fn run(config: PipelineConfig) -> PipelineReport {
    Pipeline::new(config)
        .expect("valid config")
        .run()
        .expect("pipeline should finish")
}

#[test]
#[serial]
#[ntest::timeout(20000)]
fn single_slot_single_job() {
    let report = run(
        PipelineConfig::new(1)
            .jobs_per_producer(1)
            .producers(1)
            .consumers(1)
            .timing(fast_timing())
            .seed(1),
    );

    assert_eq!(report.jobs_produced(), 1);
    assert_eq!(report.jobs_consumed(), 1);
    assert_eq!(report.stranded_jobs, 0);
    assert_eq!(report.producers[0].exit, ProducerExit::QuotaExhausted);
    assert_eq!(report.consumers[0].exit, ConsumerExit::Idle);

    let produced = &report.producers[0].produced[0];
    let consumed = &report.consumers[0].consumed[0];
    assert_eq!(produced, consumed);
    assert_eq!(consumed.id, 0);
}

#[test]
#[serial]
#[ntest::timeout(20000)]
fn two_producers_one_consumer_keeps_fifo() {
    let report = run(
        PipelineConfig::new(3)
            .jobs_per_producer(2)
            .producers(2)
            .consumers(1)
            .timing(fast_timing())
            .seed(2),
    );

    assert_eq!(report.jobs_produced(), 4);
    assert_eq!(report.jobs_consumed(), 4);
    assert!(report.high_water <= 3, "occupancy reached {}", report.high_water);

    // a lone consumer sees jobs in exactly the order they were enqueued
    let consumed = &report.consumers[0].consumed;
    let tickets: Vec<u64> = consumed.iter().map(|job| job.ticket).collect();
    assert_eq!(tickets, vec![0, 1, 2, 3]);

    for producer in &report.producers {
        let mine: Vec<u64> = consumed
            .iter()
            .filter(|job| job.producer == producer.id)
            .map(|job| job.ticket)
            .collect();
        let made: Vec<u64> = producer.produced.iter().map(|job| job.ticket).collect();
        assert_eq!(mine, made, "producer {} order changed", producer.id);
    }
}

#[test]
#[serial]
#[ntest::timeout(20000)]
fn no_producers_means_consumer_retires_empty_handed() {
    let timing = Timing::new()
        .unit(Duration::from_millis(1))
        .idle_timeout_units(20);
    let report = run(
        PipelineConfig::new(2)
            .producers(0)
            .consumers(1)
            .timing(timing),
    );

    assert_eq!(report.jobs_consumed(), 0);
    assert_eq!(report.consumers[0].exit, ConsumerExit::Idle);
    assert!(report.elapsed >= Duration::from_millis(20));
}

#[test]
#[serial]
#[ntest::timeout(30000)]
fn every_consumer_retires_once_producers_finish() {
    let timing = Timing::new()
        .unit(Duration::from_millis(1))
        .idle_timeout_units(100);
    let report = run(
        PipelineConfig::new(2)
            .jobs_per_producer(5)
            .producers(3)
            .consumers(3)
            .timing(timing)
            .seed(3),
    );

    assert!(report
        .producers
        .iter()
        .all(|p| p.exit == ProducerExit::QuotaExhausted));
    assert!(report.consumers.iter().all(|c| c.exit == ConsumerExit::Idle));
    assert_eq!(report.jobs_consumed(), 15);
    assert_eq!(report.consumed_tickets(), (0..15).collect::<Vec<_>>());
    assert_eq!(report.stranded_jobs, 0);
    assert!(report.high_water <= 2);
}

#[test]
#[serial]
#[ntest::timeout(30000)]
fn independent_pipelines_do_not_share_state() {
    let first = thread::spawn(|| {
        run(PipelineConfig::new(2)
            .jobs_per_producer(3)
            .producers(1)
            .consumers(1)
            .timing(fast_timing())
            .seed(10))
    });
    let second = thread::spawn(|| {
        run(PipelineConfig::new(1)
            .jobs_per_producer(1)
            .producers(2)
            .consumers(2)
            .timing(fast_timing())
            .seed(20))
    });

    let first = first.join().expect("first pipeline panicked");
    let second = second.join().expect("second pipeline panicked");

    assert_eq!(first.jobs_consumed(), 3);
    assert_eq!(first.consumed_tickets(), vec![0, 1, 2]);
    assert_eq!(second.jobs_consumed(), 2);
    assert_eq!(second.consumed_tickets(), vec![0, 1]);
    assert!(second.high_water <= 1);
}

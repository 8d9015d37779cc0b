//! Safety and liveness properties of the three-semaphore protocol.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crate::harness::{run_contention, ContentionConfig};
use foundation_pipeline::{Job, JobBuffer};

#[test]
#[ntest::timeout(30000)]
fn occupancy_never_exceeds_capacity() {
    for capacity in [1, 3, 8] {
        let result = run_contention(ContentionConfig::new(capacity));

        assert!(
            result.max_occupancy <= capacity,
            "capacity {capacity} but saw {}",
            result.max_occupancy
        );
        assert_eq!(result.deposit_timeouts, 0);
        assert_eq!(result.leftover, 0);
    }
}

#[test]
#[ntest::timeout(30000)]
fn every_job_is_delivered_exactly_once() {
    let config = ContentionConfig::new(4)
        .producers(6)
        .consumers(3)
        .jobs_per_producer(300);
    let result = run_contention(config);

    assert_eq!(result.total_consumed(), config.total_jobs());

    let unique: HashSet<u64> = result.tickets().into_iter().collect();
    assert_eq!(unique.len(), config.total_jobs());
    assert_eq!(
        result.tickets(),
        (0..config.total_jobs() as u64).collect::<Vec<_>>()
    );
}

#[test]
#[ntest::timeout(30000)]
fn each_consumer_sees_tickets_in_increasing_order() {
    let result = run_contention(ContentionConfig::new(5).consumers(3));

    for consumed in &result.consumed {
        assert!(
            consumed.windows(2).all(|pair| pair[0].ticket < pair[1].ticket),
            "a consumer dequeued out of order"
        );
    }
}

#[test]
#[ntest::timeout(10000)]
fn full_queue_blocks_producer_until_a_slot_is_freed() {
    let buffer = Arc::new(JobBuffer::new(1));
    assert!(buffer
        .empty_slots()
        .timed_wait(Duration::from_millis(10))
        .is_acquired());
    buffer.lock().enqueue(Job::new(1, 1)).expect("slot reserved");
    buffer.full_slots().signal();

    let acquired = Arc::new(AtomicBool::new(false));
    let (started_sender, started) = mpsc::channel();

    let producer = {
        let buffer = Arc::clone(&buffer);
        let acquired = Arc::clone(&acquired);
        thread::spawn(move || {
            started_sender.send(()).expect("should send");
            let outcome = buffer.empty_slots().timed_wait(Duration::from_secs(5));
            acquired.store(true, Ordering::SeqCst);
            (outcome, Instant::now())
        })
    };

    started.recv().expect("producer should start");
    thread::sleep(Duration::from_millis(100));
    assert!(
        !acquired.load(Ordering::SeqCst),
        "producer got a slot while the queue was full"
    );

    assert!(buffer
        .full_slots()
        .timed_wait(Duration::from_millis(10))
        .is_acquired());
    let job = buffer.lock().dequeue().expect("item reserved");
    let freed_at = Instant::now();
    buffer.empty_slots().signal();

    let (outcome, acquired_at) = producer.join().expect("should safely join");
    assert!(outcome.is_acquired());
    assert!(acquired_at >= freed_at);
    assert_eq!(job.ticket, 0);
}

#[test]
#[ntest::timeout(10000)]
fn producer_gives_up_when_no_slot_frees() {
    let buffer = JobBuffer::new(1);
    assert!(buffer
        .empty_slots()
        .timed_wait(Duration::from_millis(10))
        .is_acquired());

    let started = Instant::now();
    let outcome = buffer.empty_slots().timed_wait(Duration::from_millis(60));

    assert!(outcome.is_timeout());
    assert!(started.elapsed() >= Duration::from_millis(60));
    assert_eq!(buffer.empty_slots().available(), 0);
}

#[test]
#[ntest::timeout(10000)]
fn consumers_retire_once_producers_are_done() {
    let config = ContentionConfig::new(2)
        .producers(2)
        .consumers(4)
        .jobs_per_producer(20)
        .idle_timeout(Duration::from_millis(50));

    let result = run_contention(config);

    assert_eq!(result.total_consumed(), 40);
    assert!(result.duration >= Duration::from_millis(50));
}

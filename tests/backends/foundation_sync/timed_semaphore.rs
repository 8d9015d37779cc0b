//! Cross-thread behaviour of the semaphore primitives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use foundation_sync::{SemaphoreMutex, TimedSemaphore, WaitOutcome};

#[test]
#[ntest::timeout(10000)]
fn timed_out_waiters_leave_permits_for_others() {
    let semaphore = Arc::new(TimedSemaphore::new(0));
    let timeouts = Arc::new(AtomicUsize::new(0));

    let impatient: Vec<_> = (0..4)
        .map(|_| {
            let semaphore = Arc::clone(&semaphore);
            let timeouts = Arc::clone(&timeouts);
            thread::spawn(move || {
                if semaphore.timed_wait(Duration::from_millis(20)).is_timeout() {
                    timeouts.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in impatient {
        handle.join().expect("should safely join");
    }
    assert_eq!(timeouts.load(Ordering::SeqCst), 4);

    semaphore.signal();
    semaphore.signal();
    assert_eq!(semaphore.available(), 2);
    assert_eq!(
        semaphore.timed_wait(Duration::from_millis(5)),
        WaitOutcome::Acquired
    );
    assert_eq!(semaphore.available(), 1);
}

#[test]
#[ntest::timeout(10000)]
fn each_signal_releases_one_waiter() {
    let semaphore = Arc::new(TimedSemaphore::new(0));
    let woken = Arc::new(AtomicUsize::new(0));

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let semaphore = Arc::clone(&semaphore);
            let woken = Arc::clone(&woken);
            thread::spawn(move || {
                if semaphore.timed_wait(Duration::from_millis(500)).is_acquired() {
                    woken.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(30));
    semaphore.signal();
    semaphore.signal();

    for waiter in waiters {
        waiter.join().expect("should safely join");
    }

    assert_eq!(woken.load(Ordering::SeqCst), 2);
    assert_eq!(semaphore.available(), 0);
}

#[test]
#[ntest::timeout(10000)]
fn semaphore_mutex_holds_off_a_timed_locker() {
    let shared = Arc::new(SemaphoreMutex::new(Vec::<usize>::new()));

    let guard = shared.lock();
    let contender = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || shared.lock_timeout(Duration::from_millis(30)).is_none())
    };
    assert!(contender.join().expect("should safely join"));
    drop(guard);

    let writers: Vec<_> = (0..4)
        .map(|id| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..100 {
                    shared.lock().push(id);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("should safely join");
    }

    assert_eq!(shared.lock().len(), 400);
    assert!(!shared.is_locked());
}

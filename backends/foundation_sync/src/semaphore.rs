//! Counting semaphore with an optional deadline on acquisition.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use derive_more::Display;

/// Result of a [`TimedSemaphore::timed_wait`] call.
#[must_use]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A permit was taken.
    #[display("acquired")]
    Acquired,

    /// The deadline passed before a permit became available. No permit
    /// was taken.
    #[display("timed out")]
    TimedOut,
}

impl WaitOutcome {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }

    #[must_use]
    pub fn is_acquired(&self) -> bool {
        matches!(self, WaitOutcome::Acquired)
    }
}

/// `TimedSemaphore` is a counting semaphore built on a `Mutex<usize>` and a
/// `Condvar`.
///
/// [`Self::signal`] adds one permit and wakes at most one waiter,
/// [`Self::wait`] removes one permit blocking until one exists, and
/// [`Self::timed_wait`] does the same but gives up once the timeout elapses.
///
/// Waiters are not served in FIFO order.
pub struct TimedSemaphore {
    /// Number of permits currently available.
    permits: Mutex<usize>,

    /// Notified once per [`Self::signal`].
    available: Condvar,
}

impl core::fmt::Debug for TimedSemaphore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimedSemaphore")
            .field("permits", &self.available())
            .finish()
    }
}

impl Default for TimedSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TimedSemaphore {
    /// Creates a semaphore holding `permits` permits.
    #[must_use]
    pub const fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    // The count is a plain integer which is never left half-updated, so a
    // poisoned lock still guards a consistent value.
    fn permits(&self) -> MutexGuard<'_, usize> {
        match self.permits.lock() {
            Ok(guard) => guard,
            Err(err) => err.into_inner(),
        }
    }

    /// Returns the permit count at the time of the call.
    #[must_use]
    pub fn available(&self) -> usize {
        *self.permits()
    }

    /// Adds a permit and wakes at most one blocked waiter.
    pub fn signal(&self) {
        let mut permits = self.permits();
        *permits += 1;
        drop(permits);

        self.available.notify_one();
    }

    /// Takes a permit, blocking the current thread until one is available.
    pub fn wait(&self) {
        let mut permits = self.permits();
        while *permits == 0 {
            permits = match self.available.wait(permits) {
                Ok(guard) => guard,
                Err(err) => err.into_inner(),
            };
        }
        *permits -= 1;
    }

    /// Takes a permit if one is available right now.
    #[must_use]
    pub fn try_wait(&self) -> bool {
        let mut permits = self.permits();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Takes a permit, blocking for at most `timeout`.
    ///
    /// Spurious wakeups and wakeups lost to another waiter put the thread
    /// back to sleep for whatever is left of the original timeout. On
    /// [`WaitOutcome::TimedOut`] the permit count is exactly what it would
    /// have been had this call never happened.
    pub fn timed_wait(&self, timeout: Duration) -> WaitOutcome {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return WaitOutcome::Acquired;
        };

        let mut permits = self.permits();
        while *permits == 0 {
            let now = Instant::now();
            if now >= deadline {
                tracing::trace!(?timeout, "semaphore wait timed out");
                return WaitOutcome::TimedOut;
            }

            permits = match self.available.wait_timeout(permits, deadline - now) {
                Ok((guard, _)) => guard,
                Err(err) => err.into_inner().0,
            };
        }

        *permits -= 1;
        WaitOutcome::Acquired
    }
}

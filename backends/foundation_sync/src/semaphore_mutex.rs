//! Mutual exclusion built from a binary [`TimedSemaphore`].
//!
//! The value behind a [`SemaphoreMutex`] carries no synchronization of its
//! own: exclusive access comes entirely from holding the single permit of
//! the inner semaphore. Taking the permit happens in [`SemaphoreMutex::lock`],
//! handing it back happens when the returned guard is dropped.

use core::cell::UnsafeCell;
use core::fmt;
use core::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::semaphore::{TimedSemaphore, WaitOutcome};

/// A value guarded by a binary semaphore.
///
/// The semaphore is private and only ever signalled by a dropping
/// [`SemaphoreMutexGuard`], so its count stays within `0..=1`.
pub struct SemaphoreMutex<T: ?Sized> {
    permit: TimedSemaphore,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is only handed out through a guard, and a guard
// only exists while the single permit is held. The semaphore's inner mutex
// orders every release before the next acquisition.
unsafe impl<T: ?Sized + Send> Send for SemaphoreMutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for SemaphoreMutex<T> {}

/// RAII guard for [`SemaphoreMutex`]; signals the semaphore on drop.
pub struct SemaphoreMutexGuard<'a, T: ?Sized + 'a> {
    mutex: &'a SemaphoreMutex<T>,
}

unsafe impl<T: ?Sized + Sync> Sync for SemaphoreMutexGuard<'_, T> {}

impl<T> SemaphoreMutex<T> {
    /// Creates a new unlocked mutex around `data`.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            permit: TimedSemaphore::new(1),
            data: UnsafeCell::new(data),
        }
    }

    /// Consumes the mutex and returns the guarded value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> SemaphoreMutex<T> {
    /// Waits for the permit without a deadline.
    pub fn lock(&self) -> SemaphoreMutexGuard<'_, T> {
        self.permit.wait();
        SemaphoreMutexGuard { mutex: self }
    }

    /// Waits for the permit for at most `timeout`.
    pub fn lock_timeout(&self, timeout: Duration) -> Option<SemaphoreMutexGuard<'_, T>> {
        match self.permit.timed_wait(timeout) {
            WaitOutcome::Acquired => Some(SemaphoreMutexGuard { mutex: self }),
            WaitOutcome::TimedOut => None,
        }
    }

    /// Takes the permit only if nobody holds it.
    pub fn try_lock(&self) -> Option<SemaphoreMutexGuard<'_, T>> {
        if self.permit.try_wait() {
            Some(SemaphoreMutexGuard { mutex: self })
        } else {
            None
        }
    }

    /// Returns `true` while some guard is alive.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.permit.available() == 0
    }

    /// Mutable access without locking; the borrow checker proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

impl<T: Default> Default for SemaphoreMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SemaphoreMutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_lock() {
            Some(guard) => f
                .debug_struct("SemaphoreMutex")
                .field("data", &&*guard)
                .finish(),
            None => f
                .debug_struct("SemaphoreMutex")
                .field("data", &format_args!("<locked>"))
                .finish(),
        }
    }
}

impl<T: ?Sized> Deref for SemaphoreMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard holds the only permit.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> DerefMut for SemaphoreMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard holds the only permit.
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for SemaphoreMutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.permit.signal();
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SemaphoreMutexGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

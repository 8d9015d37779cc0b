//! Blocking synchronization primitives used by the pipeline backends.
//!
//! - [`TimedSemaphore`]: a counting semaphore whose waits can give up after a
//!   deadline, reporting [`WaitOutcome::TimedOut`] instead of blocking forever.
//! - [`SemaphoreMutex`]: a binary [`TimedSemaphore`] that owns the value it
//!   guards, so the guarded value can only be reached while the permit is held.
//!
//! # Examples
//!
//! ```rust
//! use foundation_sync::{TimedSemaphore, WaitOutcome};
//! use std::time::Duration;
//!
//! let slots = TimedSemaphore::new(1);
//! assert_eq!(slots.timed_wait(Duration::from_millis(10)), WaitOutcome::Acquired);
//! assert_eq!(slots.timed_wait(Duration::from_millis(10)), WaitOutcome::TimedOut);
//!
//! slots.signal();
//! assert_eq!(slots.available(), 1);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod semaphore;
pub mod semaphore_mutex;

pub use semaphore::{TimedSemaphore, WaitOutcome};
pub use semaphore_mutex::{SemaphoreMutex, SemaphoreMutexGuard};

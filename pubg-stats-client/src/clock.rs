//! Time source and sleep primitive.
//!
//! The rate limiter, cache, and request executor never read the wall clock
//! directly; they go through [`Clock`] so tests can substitute a virtual
//! time source and assert exact wait durations without real sleeping.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::Instant;

/// A source of monotonic time and a suspension primitive.
#[async_trait]
pub trait Clock: Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Suspends the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The default clock, backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A virtual clock for tests.
///
/// `sleep` advances the virtual now instead of suspending, and records the
/// requested duration so tests can assert exactly how long a component
/// decided to wait.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    base: Instant,
    offset: std::sync::Arc<std::sync::Mutex<Duration>>,
    slept: std::sync::Arc<std::sync::Mutex<Vec<Duration>>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Default::default(),
            slept: Default::default(),
        }
    }

    /// Moves the virtual now forward by `duration`.
    pub(crate) fn advance(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
    }

    /// Returns every duration passed to `sleep` so far, in call order.
    pub(crate) fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        self.advance(duration);
    }
}

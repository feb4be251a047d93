//! Local request-rate throttling.
//!
//! The PUBG API allows a fixed number of requests per second per key.
//! Rather than letting bursts reach the server and bounce off its 429
//! responses, [`RateLimiter`] tracks a sliding window of recent request
//! timestamps and delays any request that would exceed the budget until the
//! oldest timestamp ages out of the window.

use crate::clock::Clock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

/// A sliding-window rate limiter private to one client instance.
///
/// The timestamp window is guarded by an async mutex; the check-then-append
/// sequence (including the single wait) runs under the lock, so concurrent
/// callers cannot both observe "under limit" and jointly exceed the budget.
#[derive(Debug)]
pub struct RateLimiter {
    /// Timestamps of admitted requests within the trailing window, oldest first.
    window: tokio::sync::Mutex<VecDeque<Instant>>,
    max_requests: usize,
    window_len: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per `window_len`.
    pub fn new(max_requests: usize, window_len: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: tokio::sync::Mutex::new(VecDeque::with_capacity(max_requests + 1)),
            max_requests,
            window_len,
            clock,
        }
    }

    /// Blocks until issuing one more request stays within the rate budget,
    /// then records the current timestamp as a new request event.
    ///
    /// Admission never rejects; at worst the caller waits until the oldest
    /// in-window timestamp expires. An empty window admits immediately.
    pub async fn admit(&self) {
        let mut window = self.window.lock().await;
        let now = self.clock.now();

        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) >= self.window_len {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() >= self.max_requests {
            if let Some(oldest) = window.front() {
                // Exactly one slot frees when the oldest entry ages out, so
                // a single wait is enough; no re-check loop.
                let wait = (*oldest + self.window_len).duration_since(now);
                if !wait.is_zero() {
                    debug!(
                        wait_ms = wait.as_millis() as u64,
                        in_window = window.len(),
                        "Rate budget exhausted, delaying request"
                    );
                    self.clock.sleep(wait).await;
                }
            }
        }

        window.push_back(self.clock.now());
    }
}

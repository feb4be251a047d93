//! Time-expiring response cache.
//!
//! Cached envelopes live in process memory for the lifetime of one client
//! instance. Expiry is purely time-based and checked lazily on read; a
//! stale entry reads as absent and is overwritten by the next store on its
//! key. There is no capacity bound; the working set is keyed by
//! caller-supplied name lists and stays small.

use crate::clock::Clock;
use crate::envelope::Envelope;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Envelope,
    stored_at: Instant,
}

/// An in-memory key→envelope store with time-based expiry.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Creates an empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Returns the cached envelope for `key` if it is younger than the TTL.
    ///
    /// A stale entry is treated as absent but left in place; the next
    /// [`set`](Self::set) on the same key overwrites it.
    pub fn get(&self, key: &str) -> Option<Envelope> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;

        if self.clock.now().duration_since(entry.stored_at) < self.ttl {
            Some(entry.value.clone())
        } else {
            debug!(key, "Cache entry expired");
            None
        }
    }

    /// Stores `value` under `key`, unconditionally replacing any prior entry.
    pub fn set(&self, key: String, value: Envelope) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }
}

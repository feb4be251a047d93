//! The public client: player lookups with cache-around-read.

mod config;
mod error;

pub use config::{
    ClientConfig, DEFAULT_BACKOFF_BASE, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_PLATFORM,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use error::ClientError;

use crate::cache::ResponseCache;
use crate::envelope::Envelope;
use crate::rate_limit::RateLimiter;
use crate::request::RequestExecutor;
use reqwest::Method;
use tracing::{debug, info};

/// Maximum number of player names the API accepts per request.
pub const MAX_PLAYERS_PER_REQUEST: usize = 10;

/// An authenticated client for the PUBG statistics API.
///
/// One instance owns its own rate-limiter window and response cache;
/// neither is shared across instances or processes. The client may be
/// shared across tasks behind an `Arc`; the limiter and cache serialize
/// their own mutations.
#[derive(Debug)]
pub struct Client {
    executor: RequestExecutor,
    cache: ResponseCache,
}

impl Client {
    /// Builds a client from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the API key is empty, or
    /// [`ClientError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.api_key().is_empty() {
            return Err(ClientError::Validation {
                message: "API key must not be empty".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let limiter = RateLimiter::new(config.rate_limit(), config.rate_window(), config.clock());
        let cache = ResponseCache::new(config.cache_ttl(), config.clock());
        let executor = RequestExecutor::new(&config, http, limiter);

        Ok(Self { executor, cache })
    }

    /// Looks up players by name and returns the merged response envelope.
    ///
    /// Results are cached for the configured TTL, keyed by the name list as
    /// given (order-sensitive); a cache hit performs no network activity and
    /// consumes no rate-limit slots. Lists longer than
    /// [`MAX_PLAYERS_PER_REQUEST`] are fetched as strictly sequential chunks
    /// and each subsequent chunk's `data` is appended, in order, to the
    /// first chunk's envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if `names` is empty or contains
    /// an empty name. A failure on any chunk aborts the whole call; nothing
    /// is cached and no partial result is returned.
    pub async fn get_player_info(&self, names: &[String]) -> Result<Envelope, ClientError> {
        validate_names(names)?;

        let key = cache_key(names);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key, "Returning cached player info");
            return Ok(cached);
        }

        let (first, rest) = names.split_at(names.len().min(MAX_PLAYERS_PER_REQUEST));
        let mut merged = self.fetch_chunk(first).await?;
        for chunk in rest.chunks(MAX_PLAYERS_PER_REQUEST) {
            let envelope = self.fetch_chunk(chunk).await?;
            merged.data.extend(envelope.data);
        }

        info!(
            players = names.len(),
            fetched = merged.data.len(),
            "Fetched player info"
        );
        self.cache.set(key, merged.clone());
        Ok(merged)
    }

    /// Fetches one chunk of at most [`MAX_PLAYERS_PER_REQUEST`] names from
    /// the `/players` endpoint.
    async fn fetch_chunk(&self, names: &[String]) -> Result<Envelope, ClientError> {
        let filter = names.join(",");
        self.executor
            .execute(Method::GET, "players", &[("filter[playerNames]", filter)])
            .await
    }
}

/// Derives the cache key for a name list.
///
/// Deterministic for identical input, and order-sensitive: the same names
/// in a different order form a distinct key and a distinct fetch.
fn cache_key(names: &[String]) -> String {
    names.join(",")
}

fn validate_names(names: &[String]) -> Result<(), ClientError> {
    if names.is_empty() {
        return Err(ClientError::Validation {
            message: "player name list must not be empty".to_string(),
        });
    }
    if names.iter().any(|name| name.is_empty()) {
        return Err(ClientError::Validation {
            message: "player names must not be empty strings".to_string(),
        });
    }
    Ok(())
}

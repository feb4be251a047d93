//! Client configuration.

use crate::cache::DEFAULT_TTL;
use crate::clock::{Clock, SystemClock};
use crate::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default base URL of the PUBG API.
pub const DEFAULT_BASE_URL: &str = "https://api.pubg.com/";

/// Default platform shard.
pub const DEFAULT_PLATFORM: &str = "steam";

/// Default maximum attempts per logical request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first backoff delay; doubles with each retried attempt.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Default transport-level timeout per HTTP attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token for the API.
    api_key: String,
    /// Platform shard (`steam`, `xbox`, `psn`, `stadia`). Not validated
    /// locally; the server answers an unknown shard with a 404.
    platform: String,
    /// Base URL of the API.
    base_url: Url,
    /// Lifetime of cached responses.
    cache_ttl: Duration,
    /// Maximum attempts per logical request.
    max_retries: u32,
    /// First backoff delay; doubles with each retried attempt.
    backoff_base: Duration,
    /// Requests allowed per rate window.
    rate_limit: usize,
    /// Rate window length.
    rate_window: Duration,
    /// Transport-level timeout per HTTP attempt.
    request_timeout: Duration,
    /// Time source used by the limiter, cache, and backoff waits.
    clock: Arc<dyn Clock>,
}

impl ClientConfig {
    /// Creates a configuration with the given API key and defaults for
    /// everything else.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            platform: DEFAULT_PLATFORM.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            cache_ttl: DEFAULT_TTL,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            rate_limit: DEFAULT_MAX_REQUESTS,
            rate_window: DEFAULT_WINDOW,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the platform shard.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Sets the base URL, e.g. to point at a mock server in tests.
    ///
    /// A missing trailing slash on the path is added so endpoint paths
    /// append to the base instead of replacing its last segment.
    pub fn with_base_url(mut self, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        self.base_url = base_url;
        self
    }

    /// Sets the cache entry lifetime.
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Sets the maximum attempts per logical request.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first backoff delay.
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Sets the rate budget: `rate_limit` requests per `rate_window`.
    pub fn with_rate_limit(mut self, rate_limit: usize, rate_window: Duration) -> Self {
        self.rate_limit = rate_limit;
        self.rate_window = rate_window;
        self
    }

    /// Sets the transport-level timeout per HTTP attempt.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the platform shard.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the cache entry lifetime.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Returns the maximum attempts per logical request.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the first backoff delay.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Returns the requests allowed per rate window.
    pub fn rate_limit(&self) -> usize {
        self.rate_limit
    }

    /// Returns the rate window length.
    pub fn rate_window(&self) -> Duration {
        self.rate_window
    }

    /// Returns the transport-level timeout per HTTP attempt.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the time source.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

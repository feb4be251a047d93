//! Single-request execution.
//!
//! [`RequestExecutor`] composes rate-limit admission, the HTTP exchange,
//! response decoding, and bounded retry with exponential backoff into one
//! "perform a logical request" operation.

use crate::client::{ClientConfig, ClientError};
use crate::clock::Clock;
use crate::envelope::Envelope;
use crate::rate_limit::RateLimiter;
use reqwest::{header, Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Media type served by the PUBG API.
const ACCEPT_JSON_API: &str = "application/vnd.api+json";

/// How a single attempt failed.
#[derive(Debug)]
enum AttemptFailure {
    /// The server answered with a non-success status; retryable.
    Status(StatusCode),
    /// The exchange failed before a status was available; retryable.
    Transport(reqwest::Error),
    /// Not retryable; propagated to the caller as-is.
    Fatal(ClientError),
}

impl AttemptFailure {
    /// Converts a failure into the error surfaced once retries are exhausted.
    fn into_error(self, attempts: u32) -> ClientError {
        match self {
            Self::Status(status) => ClientError::Request {
                status: status.as_u16(),
                attempts,
            },
            Self::Transport(source) => ClientError::Transport(source),
            Self::Fatal(error) => error,
        }
    }
}

/// Executes logical API requests against one platform shard.
#[derive(Debug)]
pub struct RequestExecutor {
    http: reqwest::Client,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    base_url: Url,
    api_key: String,
    platform: String,
    max_retries: u32,
    backoff_base: Duration,
}

impl RequestExecutor {
    /// Builds an executor from the client configuration, a prepared HTTP
    /// client, and the rate limiter it will consult before every attempt.
    pub fn new(config: &ClientConfig, http: reqwest::Client, limiter: RateLimiter) -> Self {
        Self {
            http,
            limiter,
            clock: config.clock(),
            base_url: config.base_url().clone(),
            api_key: config.api_key().to_string(),
            platform: config.platform().to_string(),
            max_retries: config.max_retries(),
            backoff_base: config.backoff_base(),
        }
    }

    /// Performs `method` against `/shards/<platform>/<endpoint>` with the
    /// given flat query parameters and returns the decoded envelope.
    ///
    /// Every attempt consumes a rate-limit slot whether or not it succeeds.
    /// A 429 or any other non-success status is retried with exponential
    /// backoff until `max_retries` attempts have been made. A success body
    /// that fails to decode, or a decoded envelope carrying a non-empty
    /// `errors` array, fails immediately without retrying.
    ///
    /// # Errors
    ///
    /// [`ClientError::Request`] after exhausting retries on non-success
    /// statuses, [`ClientError::Transport`] after exhausting retries on
    /// below-status failures, [`ClientError::Parse`] for a malformed success
    /// body, and [`ClientError::Api`] for a server-reported rejection.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope, ClientError> {
        let url = format!("{}shards/{}/{}", self.base_url, self.platform, endpoint);

        let mut attempt: u32 = 1;
        loop {
            debug!(endpoint, attempt, "Issuing API request");

            match self.attempt(method.clone(), &url, query).await {
                Ok(envelope) => return Ok(envelope),
                Err(AttemptFailure::Fatal(error)) => return Err(error),
                Err(failure) if attempt >= self.max_retries => {
                    return Err(failure.into_error(attempt));
                }
                Err(failure) => {
                    let delay = self.backoff_delay(attempt);
                    match &failure {
                        AttemptFailure::Status(status)
                            if *status == StatusCode::TOO_MANY_REQUESTS =>
                        {
                            warn!(
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Server rate limit hit, backing off"
                            );
                        }
                        AttemptFailure::Status(status) => {
                            warn!(
                                status = status.as_u16(),
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Request failed, backing off"
                            );
                        }
                        AttemptFailure::Transport(error) => {
                            warn!(
                                error = %error,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Transport failure, backing off"
                            );
                        }
                        AttemptFailure::Fatal(_) => {}
                    }
                    self.clock.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Runs one attempt: rate admission, the HTTP exchange, and decoding.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope, AttemptFailure> {
        self.limiter.admit().await;

        let response = self
            .http
            .request(method, url)
            .query(query)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, ACCEPT_JSON_API)
            .send()
            .await
            .map_err(AttemptFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status));
        }

        let body = response.text().await.map_err(AttemptFailure::Transport)?;
        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|source| AttemptFailure::Fatal(ClientError::Parse { source }))?;

        // A well-formed response that carries errors is a semantic
        // rejection, not a transient fault.
        if let Some(detail) = envelope.first_error_detail() {
            return Err(AttemptFailure::Fatal(ClientError::Api {
                detail: detail.to_string(),
            }));
        }

        Ok(envelope)
    }

    /// Returns the delay before the attempt after `attempt`: the base
    /// doubled per completed attempt, giving 2 s, 4 s, 8 s at the defaults.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

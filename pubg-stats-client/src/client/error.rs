//! Client error types.

use thiserror::Error;

/// Errors surfaced by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed caller input; surfaced immediately, never retried.
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// The server kept answering with a non-success status until retries
    /// ran out.
    #[error("Request failed with status {status} after {attempts} attempts")]
    Request { status: u16, attempts: u32 },

    /// A success response carried a body that did not decode as an
    /// envelope; never retried.
    #[error("Failed to decode response body: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// The server rejected the request with an `errors` array; the detail
    /// text is reported verbatim. Never retried.
    #[error("API error: {detail}")]
    Api { detail: String },

    /// The HTTP exchange failed below the status-code level (connect,
    /// timeout, TLS), and retries were exhausted.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

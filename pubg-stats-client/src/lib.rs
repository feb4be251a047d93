#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod cache;
pub mod client;
pub mod clock;
pub mod envelope;
pub mod rate_limit;
pub mod request;

pub use cache::ResponseCache;
pub use client::{Client, ClientConfig, ClientError, MAX_PLAYERS_PER_REQUEST};
pub use clock::{Clock, SystemClock};
pub use envelope::{Envelope, ErrorDetail};
pub use rate_limit::RateLimiter;
pub use request::RequestExecutor;

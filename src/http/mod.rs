//! HTTP transport module
//!
//! Provides the [`Transport`] seam and its reqwest implementation with
//! retry, rate limiting, and backoff strategies.
//!
//! # Features
//!
//! - **Injectable transport**: anything implementing [`Transport`]
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ApiRequest, Transport};

#[cfg(test)]
pub(crate) mod mock;

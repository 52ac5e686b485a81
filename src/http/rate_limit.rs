//! Client-side request throttling
//!
//! The open platform applies per-app quotas to hire endpoints and answers
//! with 429 once they are exceeded. A governor token bucket keeps a client
//! below the quota so that retries stay the exception.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Throttling settings, as found under `http.rate_limit` in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Requests allowed back to back before throttling kicks in
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl RateLimiterConfig {
    /// Settings for `requests_per_second` with the given burst
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Governor quota; zero rates and bursts count as one
    fn quota(&self) -> Quota {
        let at_least_one = |n: u32| NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(at_least_one(self.requests_per_second))
            .allow_burst(at_least_one(self.burst_size))
    }
}

/// Token bucket shared by every clone of an [`HttpClient`](super::HttpClient)
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DirectLimiter>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Build a limiter from its settings
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            bucket: Arc::new(DirectLimiter::direct(config.quota())),
            config: config.clone(),
        }
    }

    /// Settings this limiter was built from
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Suspend until the bucket has a token for one request
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a token if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.config.requests_per_second)
            .field("burst_size", &self.config.burst_size)
            .finish_non_exhaustive()
    }
}

//! reqwest-backed [`Transport`]
//!
//! Each request waits for the rate limiter, then is sent up to
//! `max_retries + 1` times. 429, 5xx gateway errors, timeouts and refused
//! connections are retried; other 4xx answers come back at once with their
//! body. 429 waits for `Retry-After`, everything else for the backoff delay.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::{ApiRequest, Transport};
use crate::error::{Error, Result};
use crate::types::{header_key, BackoffType, JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently a failed request is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Growth of the wait between attempts
    pub backoff: BackoffType,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any wait
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (zero based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt, self.initial_delay, self.max_delay)
    }
}

/// Settings for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry budget and backoff
    pub retry: RetryPolicy,
    /// `None` disables client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
    /// Sent with every request; request headers win on conflict
    pub default_headers: StringMap,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Start from the defaults
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder(Self::default())
    }
}

/// Chained setters over [`HttpClientConfig`]
#[derive(Debug, Clone)]
pub struct HttpClientConfigBuilder(HttpClientConfig);

impl HttpClientConfigBuilder {
    /// Per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.0.timeout = timeout;
        self
    }

    /// Retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.0.retry.max_retries = retries;
        self
    }

    /// Backoff shape with its first and largest delay
    pub fn backoff(mut self, kind: BackoffType, initial: Duration, max: Duration) -> Self {
        self.0.retry = RetryPolicy {
            backoff: kind,
            initial_delay: initial,
            max_delay: max,
            ..self.0.retry
        };
        self
    }

    /// Throttle with the given settings
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.0.rate_limit = Some(config);
        self
    }

    /// Send without client-side throttling
    pub fn no_rate_limit(mut self) -> Self {
        self.0.rate_limit = None;
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.default_headers.insert(header_key(name), value.into());
        self
    }

    /// Replace the `User-Agent`
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.0.user_agent = agent.into();
        self
    }

    /// Finish
    pub fn build(self) -> HttpClientConfig {
        self.0
    }
}

/// Retrying, rate-limited HTTP client for the open platform
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Client with [`HttpClientConfig::default`]
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client with the given settings
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            client,
            config,
        })
    }

    /// Settings in use
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Whether requests are throttled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Execute a request, retrying retryable failures.
    ///
    /// Makes at most `max_retries + 1` attempts. Once retries are used up the
    /// last attempt's error is returned.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let max_retries = request.max_retries.unwrap_or(self.config.retry.max_retries);
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            match self.attempt(request, attempt).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, .. } if attempt >= max_retries => return Err(error),
                Attempt::Retry { error, delay } => {
                    warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        ?delay,
                        %error,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Send once and classify the outcome
    async fn attempt(&self, request: &ApiRequest, attempt: u32) -> Attempt {
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let response = match self.prepare(request, timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry {
                    error: Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    },
                    delay: self.calculate_backoff(attempt),
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Retry {
                    error: Error::Http(e),
                    delay: self.calculate_backoff(attempt),
                }
            }
            Err(e) => return Attempt::Fail(Error::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = retry_after(&response);
            return Attempt::Retry {
                error: Error::RateLimited {
                    retry_after_seconds,
                },
                delay: Duration::from_secs(retry_after_seconds),
            };
        }

        if !(status.is_client_error() || status.is_server_error()) {
            debug!(method = %request.method, url = %request.url, %status, "request succeeded");
            return Attempt::Done(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);
        if error.is_retryable() {
            Attempt::Retry {
                error,
                delay: self.calculate_backoff(attempt),
            }
        } else {
            Attempt::Fail(error)
        }
    }

    fn prepare(&self, request: &ApiRequest, timeout: Duration) -> reqwest::RequestBuilder {
        let headers: StringMap = self
            .config
            .default_headers
            .iter()
            .chain(&request.headers)
            .map(|(name, value)| (header_key(name.as_str()), value.clone()))
            .collect();
        let mut builder = headers.iter().fold(
            self.client
                .request(request.method.into(), &request.url)
                .timeout(timeout),
            |builder, (key, value)| builder.header(key.as_str(), value.as_str()),
        );

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        builder
    }

    /// Wait before retry number `attempt`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        self.config.retry.delay(attempt)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<JsonValue> {
        let response = self.execute(&request).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.config.timeout)
            .field("retry", &self.config.retry)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

/// Outcome of a single attempt
enum Attempt {
    Done(Response),
    Retry { error: Error, delay: Duration },
    Fail(Error),
}

/// Seconds from a `Retry-After` header, 60 when absent or unparseable
fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60)
}

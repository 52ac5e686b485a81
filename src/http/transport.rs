//! Transport seam between request assembly and the network
//!
//! Every operation ends in a single [`Transport::send`] call. The default
//! implementation is [`HttpClient`](super::HttpClient); tests and hosts can
//! inject their own.

use crate::error::Result;
use crate::types::{header_key, JsonValue, Method, StringMap};
use async_trait::async_trait;
use std::time::Duration;

/// A fully assembled API request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL (path parameters already substituted)
    pub url: String,
    /// Query parameters, in order; keys may repeat for array values
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl ApiRequest {
    /// Create a new request
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(key), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends assembled requests and returns the parsed JSON response.
///
/// Implementations return `Err` for network failures, non-success statuses
/// and unparseable bodies. Envelope codes are not inspected here.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and parse the JSON response body
    async fn send(&self, request: ApiRequest) -> Result<JsonValue>;
}

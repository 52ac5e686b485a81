//! Shared aliases and small value types
//!
//! Nothing here talks to the network; these are the vocabulary types the
//! catalog, transport and client modules have in common.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Any JSON value
pub type JsonValue = serde_json::Value;

/// A JSON object
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Header and query maps
pub type StringMap = HashMap<String, String>;

/// Key under which a header is stored in a [`StringMap`].
///
/// Header names are case-insensitive, so maps key them in lowercase and
/// `Authorization` and `authorization` land on the same entry.
pub fn header_key(name: impl Into<String>) -> String {
    let mut name = name.into();
    name.make_ascii_lowercase();
    name
}

// ============================================================================
// Method
// ============================================================================

/// HTTP verbs used by the hire API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "PATCH" => Ok(Self::PATCH),
            "DELETE" => Ok(Self::DELETE),
            other => Err(crate::Error::config(format!("Unsupported HTTP method: {other}"))),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => Self::GET,
            Method::POST => Self::POST,
            Method::PUT => Self::PUT,
            Method::PATCH => Self::PATCH,
            Method::DELETE => Self::DELETE,
        }
    }
}

// ============================================================================
// Domain
// ============================================================================

/// Open platform deployment the client talks to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// open.feishu.cn
    #[default]
    Feishu,
    /// open.larksuite.com
    Lark,
    /// Any other base URL, e.g. a private deployment or a mock server
    Custom(String),
}

impl Domain {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        match self {
            Self::Feishu => "https://open.feishu.cn",
            Self::Lark => "https://open.larksuite.com",
            Self::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

/// `feishu` and `lark` name the public deployments; anything else is a URL
impl From<&str> for Domain {
    fn from(value: &str) -> Self {
        match value {
            "feishu" => Self::Feishu,
            "lark" => Self::Lark,
            url => Self::Custom(url.to_string()),
        }
    }
}

// ============================================================================
// Backoff
// ============================================================================

/// How the wait between retries grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Always `initial`
    Constant,
    /// `initial * (attempt + 1)`
    Linear,
    /// `initial * 2^attempt`
    #[default]
    Exponential,
}

impl BackoffType {
    /// Wait before retry number `attempt` (zero based), capped at `max`
    pub fn delay(self, attempt: u32, initial: Duration, max: Duration) -> Duration {
        let delay = match self {
            Self::Constant => initial,
            Self::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            Self::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(max)
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Treats empty strings as absent; env vars and YAML often carry `""`
pub trait OptionStringExt {
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        Some(self).none_if_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_method_round_trips_through_text() {
        for method in [Method::GET, Method::POST, Method::PATCH, Method::DELETE] {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
        assert_eq!("patch".parse::<Method>().unwrap(), Method::PATCH);
        assert!("TRACE".parse::<Method>().is_err());

        let yaml: Method = serde_yaml::from_str("POST").unwrap();
        assert_eq!(reqwest::Method::from(yaml), reqwest::Method::POST);
    }

    #[test]
    fn test_domain_base_url() {
        assert_eq!(Domain::from("feishu").base_url(), "https://open.feishu.cn");
        assert_eq!(Domain::from("lark").base_url(), "https://open.larksuite.com");
        assert_eq!(
            Domain::from("http://127.0.0.1:8080/").base_url(),
            "http://127.0.0.1:8080"
        );
    }

    #[test_case(BackoffType::Constant, 4, 100 ; "constant")]
    #[test_case(BackoffType::Linear, 2, 300 ; "linear")]
    #[test_case(BackoffType::Exponential, 3, 800 ; "exponential")]
    #[test_case(BackoffType::Exponential, 40, 5_000 ; "exponential capped")]
    fn test_backoff_delay(kind: BackoffType, attempt: u32, expected_ms: u64) {
        let delay = kind.delay(
            attempt,
            Duration::from_millis(100),
            Duration::from_millis(5_000),
        );
        assert_eq!(delay, Duration::from_millis(expected_ms));
    }

    #[test]
    fn test_header_key_folds_case() {
        assert_eq!(header_key("X-Tenant-Key"), "x-tenant-key");
        assert_eq!(header_key("authorization"), header_key("Authorization"));
    }

    #[test]
    fn test_none_if_empty() {
        assert_eq!(Some("x".to_string()).none_if_empty(), Some("x".to_string()));
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(String::new().none_if_empty(), None);
    }
}

//! Client configuration
//!
//! [`ClientConfig`] describes how to reach the open platform: credentials,
//! domain, token caching and HTTP tuning. It can be written by hand, loaded
//! from a YAML or JSON file, or read from `LARK_*` environment variables.
//!
//! ```yaml
//! app_id: cli_a1b2c3
//! app_secret: s3cr3t
//! domain: lark
//! http:
//!   timeout_seconds: 10
//!   max_retries: 2
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Domain, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the app id
pub const ENV_APP_ID: &str = "LARK_APP_ID";
/// Environment variable holding the app secret
pub const ENV_APP_SECRET: &str = "LARK_APP_SECRET";
/// Environment variable holding a static tenant access token
pub const ENV_TENANT_TOKEN: &str = "LARK_TENANT_ACCESS_TOKEN";
/// Environment variable selecting the domain (`feishu`, `lark` or a URL)
pub const ENV_DOMAIN: &str = "LARK_DOMAIN";
/// Environment variable disabling automatic token fetching
pub const ENV_DISABLE_TOKEN_CACHE: &str = "LARK_DISABLE_TOKEN_CACHE";

// ============================================================================
// Client Config
// ============================================================================

/// Everything needed to build a [`Hire`](crate::Hire) client
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Self-built app id
    pub app_id: Option<String>,

    /// Self-built app secret
    pub app_secret: Option<String>,

    /// Static tenant access token, used when no app credentials are set
    pub tenant_access_token: Option<String>,

    /// `feishu` (default), `lark`, or a base URL
    pub domain: Option<String>,

    /// Never fetch tenant tokens automatically
    pub disable_token_cache: bool,

    /// HTTP client settings
    pub http: HttpSettings,
}

impl ClientConfig {
    /// Load a config file. JSON files parse as YAML too.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML (or JSON) text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the config from `LARK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self::default().with_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from an environment lookup; set variables win.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).none_if_empty();

        if let Some(app_id) = var(ENV_APP_ID) {
            self.app_id = Some(app_id);
        }
        if let Some(app_secret) = var(ENV_APP_SECRET) {
            self.app_secret = Some(app_secret);
        }
        if let Some(token) = var(ENV_TENANT_TOKEN) {
            self.tenant_access_token = Some(token);
        }
        if let Some(domain) = var(ENV_DOMAIN) {
            self.domain = Some(domain);
        }
        if let Some(flag) = var(ENV_DISABLE_TOKEN_CACHE) {
            self.disable_token_cache = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Check that credentials are complete
    pub fn validate(&self) -> Result<()> {
        match (&self.app_id, &self.app_secret) {
            (Some(_), None) => Err(Error::missing_field("app_secret")),
            (None, Some(_)) => Err(Error::missing_field("app_id")),
            _ => Ok(()),
        }
    }

    /// Credentials for the token manager.
    ///
    /// App credentials take precedence over a static tenant token.
    pub fn auth_config(&self) -> AuthConfig {
        if let (Some(app_id), Some(app_secret)) = (&self.app_id, &self.app_secret) {
            return AuthConfig::AppCredentials {
                app_id: app_id.clone(),
                app_secret: app_secret.clone(),
            };
        }
        match &self.tenant_access_token {
            Some(token) => AuthConfig::TenantToken {
                token: token.clone(),
            },
            None => AuthConfig::None,
        }
    }

    /// The configured domain, Feishu when unset
    pub fn domain(&self) -> Domain {
        self.domain
            .as_deref()
            .map(Domain::from)
            .unwrap_or_default()
    }

    /// Settings for the HTTP transport
    pub fn http_client_config(&self) -> HttpClientConfig {
        self.http.to_client_config()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &redacted(&self.app_secret))
            .field("tenant_access_token", &redacted(&self.tenant_access_token))
            .field("domain", &self.domain)
            .field("disable_token_cache", &self.disable_token_cache)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum number of retries
    pub max_retries: u32,

    /// Retry backoff
    pub backoff: BackoffSettings,

    /// Token bucket rate limit; `null` disables it
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 3,
            backoff: BackoffSettings::default(),
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

impl HttpSettings {
    fn to_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );
        let builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }
}

/// Retry backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    /// Backoff type
    #[serde(rename = "type")]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    pub max_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: 100,
            max_ms: 60_000,
        }
    }
}

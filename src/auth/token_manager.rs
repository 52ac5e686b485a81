//! Token manager implementation
//!
//! Applies credentials to requests and manages tenant token refresh.

use super::types::{AuthConfig, CachedToken};
use crate::envelope::null_as_default;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, Transport};
use crate::payload::RequestOptions;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Path of the self-built app tenant token endpoint
pub const TENANT_ACCESS_TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

/// Obtains, caches and applies access tokens
pub struct TokenManager {
    /// Auth configuration
    config: AuthConfig,
    /// Whether tokens are fetched and cached automatically
    cache_enabled: bool,
    /// Cached tenant token for app credentials
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    /// Create a new token manager with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            cache_enabled: true,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Never fetch tokens automatically; every call must carry its own
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Whether tokens are fetched automatically
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply credentials to a request.
    ///
    /// Precedence: user access token, then a tenant token passed in the
    /// options, then the managed tenant token.
    pub async fn authorize(
        &self,
        request: ApiRequest,
        options: &RequestOptions,
        transport: &dyn Transport,
        base_url: &str,
    ) -> Result<ApiRequest> {
        let mut request = request;

        if let Some(ref tenant_key) = options.tenant_key {
            request = request.header("X-Tenant-Key", tenant_key);
        }

        let token = if let Some(ref token) = options.user_access_token {
            Some(token.clone())
        } else if let Some(ref token) = options.tenant_access_token {
            Some(token.clone())
        } else {
            self.tenant_access_token(transport, base_url).await?
        };

        Ok(match token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        })
    }

    /// The managed tenant access token, if any
    pub async fn tenant_access_token(
        &self,
        transport: &dyn Transport,
        base_url: &str,
    ) -> Result<Option<String>> {
        if !self.cache_enabled {
            return Ok(None);
        }

        match &self.config {
            AuthConfig::None => Ok(None),
            AuthConfig::TenantToken { token } => Ok(Some(token.clone())),
            AuthConfig::AppCredentials { app_id, app_secret } => self
                .get_or_refresh_token(transport, base_url, app_id, app_secret)
                .await
                .map(Some),
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(
        &self,
        transport: &dyn Transport,
        base_url: &str,
        app_id: &str,
        app_secret: &str,
    ) -> Result<String> {
        if let Some(token) = fresh(self.cached_token.read().await.as_ref()) {
            return Ok(token);
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = fresh(cached.as_ref()) {
            return Ok(token);
        }

        let token = fetch_tenant_token(transport, base_url, app_id, app_secret).await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    /// Clear the cached token (forces a refresh on next use)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("mode", &self.config.mode())
            .field("cache_enabled", &self.cache_enabled)
            .finish_non_exhaustive()
    }
}

/// Tenant token endpoint response
#[derive(Debug, Deserialize)]
struct TenantTokenResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    msg: String,
    #[serde(default)]
    tenant_access_token: Option<String>,
    #[serde(default)]
    expire: Option<i64>,
}

async fn fetch_tenant_token(
    transport: &dyn Transport,
    base_url: &str,
    app_id: &str,
    app_secret: &str,
) -> Result<CachedToken> {
    let url = format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        TENANT_ACCESS_TOKEN_PATH
    );
    let request = ApiRequest::post(url).json(json!({
        "app_id": app_id,
        "app_secret": app_secret,
    }));

    let body = transport
        .send(request)
        .await
        .map_err(|e| Error::TokenRefresh {
            message: format!("tenant token request failed: {e}"),
        })?;
    let response: TenantTokenResponse = serde_json::from_value(body)?;

    if response.code != 0 {
        return Err(Error::auth(format!(
            "tenant token request rejected ({}): {}",
            response.code, response.msg
        )));
    }

    let token = response
        .tenant_access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::auth("tenant token response has no tenant_access_token"))?;

    debug!(app_id, expire = ?response.expire, "fetched tenant access token");

    Ok(CachedToken::from_expire(token, response.expire))
}

fn fresh(cached: Option<&CachedToken>) -> Option<String> {
    cached.filter(|t| t.is_fresh()).map(|t| t.value.clone())
}

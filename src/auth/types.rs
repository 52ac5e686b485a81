//! Credentials and cached tokens

use chrono::{DateTime, Duration, Utc};

/// Tokens are refreshed this long before the platform expires them
pub const EXPIRY_MARGIN_SECONDS: i64 = 180;

/// Where the client's tenant access token comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// Nothing managed; every call brings its own token
    #[default]
    None,

    /// A tenant access token obtained elsewhere
    TenantToken {
        /// The token value
        token: String,
    },

    /// Self-built app credentials, exchanged for a tenant access token
    AppCredentials {
        /// App ID (`cli_...`)
        app_id: String,
        /// App secret
        app_secret: String,
    },
}

impl AuthConfig {
    /// Short label for logs; never contains a secret
    pub fn mode(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TenantToken { .. } => "tenant_token",
            Self::AppCredentials { .. } => "app_credentials",
        }
    }
}

/// A fetched tenant access token
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// Token value sent as `Bearer`
    pub value: String,
    /// `None` when the platform did not say
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Token from a token endpoint answer; `expire` is in seconds from now
    pub fn from_expire(value: String, expire: Option<i64>) -> Self {
        Self {
            value,
            expires_at: expire.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }

    /// Usable at `now`, keeping [`EXPIRY_MARGIN_SECONDS`] in reserve
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map_or(true, |at| now + Duration::seconds(EXPIRY_MARGIN_SECONDS) < at)
    }

    /// Usable right now
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_until_margin() {
        let token = CachedToken::from_expire("t-abc".to_string(), Some(7200));
        assert!(token.is_fresh());

        let expires_at = token.expires_at.unwrap();
        let inside_margin = expires_at - Duration::seconds(EXPIRY_MARGIN_SECONDS - 1);
        assert!(!token.is_fresh_at(inside_margin));

        let before_margin = expires_at - Duration::seconds(EXPIRY_MARGIN_SECONDS + 1);
        assert!(token.is_fresh_at(before_margin));
    }

    #[test]
    fn test_short_lived_token_is_stale() {
        let token = CachedToken::from_expire("t-abc".to_string(), Some(60));
        assert!(!token.is_fresh());
    }

    #[test]
    fn test_token_without_expiry_stays_fresh() {
        let token = CachedToken::from_expire("t-abc".to_string(), None);
        assert!(token.expires_at.is_none());
        assert!(token.is_fresh());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(AuthConfig::default().mode(), "none");
        let creds = AuthConfig::AppCredentials {
            app_id: "cli_x".to_string(),
            app_secret: "s3cr3t".to_string(),
        };
        assert_eq!(creds.mode(), "app_credentials");
    }
}

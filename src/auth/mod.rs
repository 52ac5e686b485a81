//! Authentication module
//!
//! Supports: static tenant tokens, self-built app credentials, and
//! per-request user/tenant token overrides.
//!
//! The `TokenManager` exchanges app credentials for a tenant access token
//! and caches it until shortly before it expires.

mod token_manager;
mod types;

pub use token_manager::{TokenManager, TENANT_ACCESS_TOKEN_PATH};
pub use types::{AuthConfig, CachedToken, EXPIRY_MARGIN_SECONDS};

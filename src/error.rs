//! Error types for lark-hire
//!
//! Every fallible call in the crate returns [`Result`]. Transport failures,
//! non-zero envelope codes and request assembly mistakes all land in the one
//! [`Error`] enum so that callers can match on what went wrong.

use thiserror::Error;

/// Everything that can go wrong talking to the hire API
#[derive(Error, Debug)]
pub enum Error {
    // ----------------------------------------------------------------------
    // Setup: configuration files, catalogs, credentials
    // ----------------------------------------------------------------------
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The token endpoint answered but refused the credentials
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The token endpoint could not be reached or returned garbage
    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    // ----------------------------------------------------------------------
    // Transport
    // ----------------------------------------------------------------------
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `body` is kept verbatim for diagnostics
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ----------------------------------------------------------------------
    // Request assembly and responses
    // ----------------------------------------------------------------------
    #[error("request miss {param} path argument")]
    MissingPathParam { param: String },

    #[error("Unknown endpoint: {resource}.{operation}")]
    UnknownEndpoint { resource: String, operation: String },

    /// Envelope with a non-zero `code`
    #[error("API error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("Endpoint {resource}.{operation} does not support pagination")]
    NotPaginated { resource: String, operation: String },

    #[error("Page reported has_more but returned no page token")]
    MissingCursor,

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn missing_path_param(param: impl Into<String>) -> Self {
        Self::MissingPathParam {
            param: param.into(),
        }
    }

    pub fn unknown_endpoint(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownEndpoint {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Error for an envelope whose `code` is not zero
    pub fn api(code: i64, msg: impl Into<String>) -> Self {
        Self::Api {
            code,
            msg: msg.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether sending the same request again may succeed.
    ///
    /// Envelope errors are never retried: the platform has already
    /// processed the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Result type alias for lark-hire
pub type Result<T> = std::result::Result<T, Error>;

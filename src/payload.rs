//! Request payloads and per-call options
//!
//! A [`Payload`] is what a caller hands to an operation: values for the URL
//! path, the query string, the JSON body and extra headers. [`RequestOptions`]
//! carries per-call overrides and credentials. [`format_payload`] merges the
//! two before request assembly.

use crate::template::value_to_string;
use crate::types::{header_key, JsonObject, JsonValue, StringMap};
use serde::{Deserialize, Serialize};

/// Caller-supplied input for one operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    /// Values for `:name` segments in the path template
    pub path: JsonObject,
    /// Query parameters
    pub params: JsonObject,
    /// JSON request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    /// Extra request headers
    pub headers: StringMap,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path parameter
    #[must_use]
    pub fn path(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    /// Set a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    #[must_use]
    pub fn data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }

    /// Set a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(key), value.into());
        self
    }

    /// Parse a payload from a JSON value such as
    /// `{"path": {...}, "params": {...}, "data": {...}}`
    pub fn from_value(value: JsonValue) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Per-call overrides and credentials
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Extra path values, overriding the payload
    pub path: JsonObject,
    /// Extra query parameters, overriding the payload
    pub params: JsonObject,
    /// Extra body fields, shallow-merged over the payload body
    pub data: Option<JsonValue>,
    /// Extra headers, overriding the payload
    pub headers: StringMap,
    /// Use this tenant access token instead of the managed one
    pub tenant_access_token: Option<String>,
    /// Act on behalf of a user
    pub user_access_token: Option<String>,
    /// Tenant key for store apps acting on a specific tenant
    pub tenant_key: Option<String>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate this call with a tenant access token
    #[must_use]
    pub fn with_tenant_token(mut self, token: impl Into<String>) -> Self {
        self.tenant_access_token = Some(token.into());
        self
    }

    /// Authenticate this call with a user access token
    #[must_use]
    pub fn with_user_access_token(mut self, token: impl Into<String>) -> Self {
        self.user_access_token = Some(token.into());
        self
    }

    /// Target a tenant by key
    #[must_use]
    pub fn with_tenant_key(mut self, key: impl Into<String>) -> Self {
        self.tenant_key = Some(key.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(key), value.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A payload after merging with options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedPayload {
    pub headers: StringMap,
    pub params: JsonObject,
    pub data: Option<JsonValue>,
    pub path: JsonObject,
}

/// Merge a payload with per-call options; options win on key collisions.
pub fn format_payload(payload: &Payload, options: &RequestOptions) -> FormattedPayload {
    let headers = payload
        .headers
        .iter()
        .chain(&options.headers)
        .map(|(name, value)| (header_key(name.as_str()), value.clone()))
        .collect();

    let mut params = payload.params.clone();
    params.extend(options.params.clone());

    let mut path = payload.path.clone();
    path.extend(options.path.clone());

    let data = match (&payload.data, &options.data) {
        (None, None) => None,
        (Some(data), None) | (None, Some(data)) => Some(data.clone()),
        (Some(JsonValue::Object(base)), Some(JsonValue::Object(extra))) => {
            let mut merged = base.clone();
            merged.extend(extra.clone());
            Some(JsonValue::Object(merged))
        }
        (Some(_), Some(extra)) => Some(extra.clone()),
    };

    FormattedPayload {
        headers,
        params,
        data,
        path,
    }
}

/// Flatten query parameters into key/value pairs.
///
/// Arrays become repeated keys and nulls are skipped.
pub fn query_pairs(params: &JsonObject) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            JsonValue::Null => {}
            JsonValue::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((key.clone(), value_to_string(item)));
                }
            }
            other => pairs.push((key.clone(), value_to_string(other))),
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_builder() {
        let payload = Payload::new()
            .path("offer_id", "o1")
            .param("user_id_type", "open_id")
            .data(json!({"offer_status": 2}))
            .header("X-Trace", "1");

        assert_eq!(payload.path["offer_id"], "o1");
        assert_eq!(payload.params["user_id_type"], "open_id");
        assert_eq!(payload.data, Some(json!({"offer_status": 2})));
        assert_eq!(payload.headers["x-trace"], "1");
    }

    #[test]
    fn test_payload_from_value_defaults() {
        let payload = Payload::from_value(json!({"params": {"page_size": 10}})).unwrap();
        assert_eq!(payload.params["page_size"], 10);
        assert!(payload.path.is_empty());
        assert!(payload.data.is_none());
    }

    #[test]
    fn test_format_payload_options_win() {
        let payload = Payload::new()
            .param("page_size", 10)
            .param("process_id", "p1")
            .path("job_id", "j1")
            .header("X-A", "payload");
        let options = RequestOptions::new()
            .param("page_size", 50)
            .header("X-A", "options")
            .header("X-B", "options");

        let formatted = format_payload(&payload, &options);

        assert_eq!(formatted.params["page_size"], 50);
        assert_eq!(formatted.params["process_id"], "p1");
        assert_eq!(formatted.path["job_id"], "j1");
        assert_eq!(formatted.headers["x-a"], "options");
        assert_eq!(formatted.headers["x-b"], "options");
        assert!(formatted.data.is_none());
    }

    #[test]
    fn test_format_payload_header_names_ignore_case() {
        let payload = Payload::from_value(json!({"headers": {"X-Request-Id": "payload"}})).unwrap();
        let options = RequestOptions::new().header("x-request-id", "options");

        let formatted = format_payload(&payload, &options);

        assert_eq!(formatted.headers.len(), 1);
        assert_eq!(formatted.headers["x-request-id"], "options");
    }

    #[test]
    fn test_format_payload_merges_object_bodies() {
        let payload = Payload::new().data(json!({"a": 1, "b": 1}));
        let options = RequestOptions {
            data: Some(json!({"b": 2, "c": 3})),
            ..Default::default()
        };

        let formatted = format_payload(&payload, &options);
        assert_eq!(formatted.data, Some(json!({"a": 1, "b": 2, "c": 3})));
    }

    #[test]
    fn test_format_payload_keeps_non_object_body() {
        let payload = Payload::new().data(json!(["x", "y"]));
        let formatted = format_payload(&payload, &RequestOptions::new());
        assert_eq!(formatted.data, Some(json!(["x", "y"])));
    }

    #[test]
    fn test_query_pairs() {
        let params = json!({
            "job_ids": ["1", "2"],
            "page_size": 20,
            "active": true,
            "page_token": null,
            "user_id_type": "open_id"
        });
        let mut pairs = query_pairs(params.as_object().unwrap());
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("active".to_string(), "true".to_string()),
                ("job_ids".to_string(), "1".to_string()),
                ("job_ids".to_string(), "2".to_string()),
                ("page_size".to_string(), "20".to_string()),
                ("user_id_type".to_string(), "open_id".to_string()),
            ]
        );
    }
}

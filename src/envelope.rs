//! Response envelope
//!
//! Every endpoint answers with `{ "code": 0, "msg": "success", "data": {...} }`.
//! A non-zero `code` is an API-level failure even when the HTTP status is 200.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};

/// The `{ code, msg, data }` wrapper returned by every endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Zero on success
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    /// Human-readable status
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    /// Resource payload
    #[serde(default)]
    pub data: JsonValue,
}

impl ApiResponse {
    /// Parse an envelope from a raw response body.
    ///
    /// A body that is not an object (e.g. an empty 200) becomes an empty
    /// successful envelope.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the platform reported success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Turn a non-zero code into [`Error::Api`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::api(self.code, self.msg))
        }
    }

    /// Take the `data` payload
    pub fn into_data(self) -> JsonValue {
        self.data
    }
}

/// Reads an explicit `null` the same as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

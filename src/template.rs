//! URL path templating
//!
//! Catalog paths use colon-prefixed segments such as
//! `/applications/:application_id/offer`. Each `:name` is replaced with the
//! matching value from the payload's `path` object and percent-encoded as a
//! path segment.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Regex for matching path parameters: `:name`
static PATH_PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([a-zA-Z_][a-zA-Z0-9_]*)").expect("path parameter regex is valid")
});

/// Names of the path parameters in a template, in order of appearance
pub fn path_params(template: &str) -> Vec<&str> {
    PATH_PARAM_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Substitute path parameters in a template, without encoding.
///
/// Fails with [`Error::MissingPathParam`] for the first parameter that is
/// absent or null in `path`.
pub fn fill_api_path(template: &str, path: &JsonObject) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PATH_PARAM_REGEX.captures_iter(template) {
        let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        result.push_str(&template[last..full.start()]);
        result.push_str(&lookup(path, name.as_str())?);
        last = full.end();
    }
    result.push_str(&template[last..]);

    Ok(result)
}

/// Join a base URL and a path template into an absolute URL.
///
/// Each rendered segment is percent-encoded, so a value containing `/` stays
/// a single segment.
pub fn build_url(base: &str, template: &str, path: &JsonObject) -> Result<String> {
    let mut url = Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::config(format!("Base URL cannot have a path: {base}")))?;
        segments.pop_if_empty();

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            segments.push(&fill_api_path(segment, path)?);
        }
    }
    Ok(url.into())
}

fn lookup(path: &JsonObject, name: &str) -> Result<String> {
    match path.get(name) {
        None | Some(JsonValue::Null) => Err(Error::missing_path_param(name)),
        Some(value) => Ok(value_to_string(value)),
    }
}

/// Render a JSON value for use in a URL
pub fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

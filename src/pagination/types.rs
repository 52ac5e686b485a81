//! Pagination types
//!
//! List endpoints answer with a `data` object such as
//! `{ "items": [...], "has_more": true, "page_token": "..." }`. Some
//! endpoints name the cursor `next_page_token` instead.

use crate::template::value_to_string;
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use serde::Serialize;

/// Fields removed from every page before it reaches the caller
pub const PAGINATION_FIELDS: [&str; 3] = ["has_more", "page_token", "next_page_token"];

/// One page of a listing, without pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Page {
    data: JsonObject,
}

impl Page {
    /// Wrap an already-stripped data object
    pub fn new(data: JsonObject) -> Self {
        Self { data }
    }

    /// The page's `items`, or an empty slice when absent
    pub fn items(&self) -> &[JsonValue] {
        self.data
            .get("items")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Any other top-level field (e.g. `total`)
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    /// The full page object
    pub fn as_object(&self) -> &JsonObject {
        &self.data
    }

    /// Consume the page into its JSON object
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.data)
    }
}

impl From<Page> for JsonValue {
    fn from(page: Page) -> Self {
        page.into_value()
    }
}

/// What to do after a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch again with this cursor
    Continue {
        /// Cursor for the next request
        cursor: String,
    },
    /// The server reported no more pages
    Done,
    /// The server reported more pages but sent no cursor
    MissingCursor,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks one traversal
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor the next request is made with; `None` for the first page
    pub cursor: Option<String>,
    /// Pages received so far
    pub pages_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }
}

/// Cursor pagination over `has_more` and `page_token` / `next_page_token`.
///
/// Only reads responses. Sending the cursor back is up to the
/// [`PageFetcher`](super::PageFetcher), which receives it as a plain value.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Response field signalling more pages
    pub has_more_field: String,
    /// Response fields holding the cursor, in order of preference
    pub cursor_fields: Vec<String>,
}

impl Default for CursorPaginator {
    fn default() -> Self {
        Self {
            has_more_field: "has_more".to_string(),
            cursor_fields: vec!["page_token".to_string(), "next_page_token".to_string()],
        }
    }
}

impl CursorPaginator {
    /// Create the paginator used by every hire list endpoint
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a response `data` value into a page and the next step.
    ///
    /// A missing or non-object `data` is an empty, final page.
    pub fn process_response(
        &self,
        data: JsonValue,
        state: &mut PaginationState,
    ) -> (Page, NextPage) {
        let mut object = match data {
            JsonValue::Object(map) => map,
            _ => JsonObject::new(),
        };

        let has_more = object.get(&self.has_more_field).is_some_and(is_truthy);
        let cursor = self
            .cursor_fields
            .iter()
            .find_map(|field| cursor_value(object.get(field)));

        for field in PAGINATION_FIELDS {
            object.remove(field);
        }
        object.remove(&self.has_more_field);
        for field in &self.cursor_fields {
            object.remove(field);
        }

        state.pages_fetched += 1;

        let next = match (has_more, cursor) {
            (false, _) => NextPage::Done,
            (true, Some(cursor)) => {
                state.set_cursor(cursor.clone());
                NextPage::Continue { cursor }
            }
            (true, None) => NextPage::MissingCursor,
        };
        if !next.is_continue() {
            state.mark_done();
        }

        (Page::new(object), next)
    }
}

/// Truthiness of a JSON flag: `false`, `0`, `""` and `null` are false
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn cursor_value(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::Null => None,
        other => value_to_string(other).none_if_empty(),
    }
}

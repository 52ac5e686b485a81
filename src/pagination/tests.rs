//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::types::JsonValue;
use futures::StreamExt;
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_case::test_case;

type Calls = Arc<Mutex<Vec<Option<String>>>>;

/// Fetcher replaying `pages` in order, recording the cursor of every call.
/// `fail_at` makes that call (0-based) fail instead.
fn scripted(pages: Vec<JsonValue>, fail_at: Option<usize>) -> (impl PageFetcher, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let pages = Arc::new(pages);

    let fetcher = fetch_fn(move |cursor: Option<String>| {
        let calls = recorded.clone();
        let pages = pages.clone();
        async move {
            let index = {
                let mut calls = calls.lock().unwrap();
                calls.push(cursor);
                calls.len() - 1
            };
            if fail_at == Some(index) {
                return Err(Error::http_status(500, "boom"));
            }
            pages
                .get(index)
                .cloned()
                .ok_or_else(|| Error::Other("no more scripted pages".to_string()))
        }
    });
    (fetcher, calls)
}

async fn drain(stream: PageStream) -> Vec<Result<Page, Error>> {
    stream.collect().await
}

// ============================================================================
// Truthiness Tests
// ============================================================================

#[test_case(json!(true), true)]
#[test_case(json!(false), false)]
#[test_case(json!(1), true)]
#[test_case(json!(0), false)]
#[test_case(json!(0.0), false)]
#[test_case(json!("yes"), true)]
#[test_case(json!(""), false)]
#[test_case(json!(null), false)]
#[test_case(json!([]), true)]
#[test_case(json!({}), true)]
fn test_is_truthy(value: JsonValue, expected: bool) {
    assert_eq!(is_truthy(&value), expected);
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_process_response_continue() {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (page, next) = paginator.process_response(
        json!({"items": [1, 2], "has_more": true, "page_token": "T1", "total": 9}),
        &mut state,
    );

    assert_eq!(next, NextPage::Continue { cursor: "T1".to_string() });
    assert_eq!(page.items(), &[json!(1), json!(2)]);
    assert_eq!(page.get("total"), Some(&json!(9)));
    for field in PAGINATION_FIELDS {
        assert!(page.get(field).is_none(), "{field} leaked into the page");
    }
    assert_eq!(state.cursor.as_deref(), Some("T1"));
    assert_eq!(state.pages_fetched, 1);
    assert!(!state.done);
}

#[test]
fn test_process_response_next_page_token_fallback() {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (page, next) = paginator.process_response(
        json!({"items": [], "has_more": true, "page_token": "", "next_page_token": "N2"}),
        &mut state,
    );

    assert_eq!(next, NextPage::Continue { cursor: "N2".to_string() });
    assert!(page.get("next_page_token").is_none());
}

#[test]
fn test_process_response_prefers_page_token() {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (_, next) = paginator.process_response(
        json!({"has_more": true, "page_token": "P", "next_page_token": "N"}),
        &mut state,
    );

    assert_eq!(next, NextPage::Continue { cursor: "P".to_string() });
}

#[test_case(json!({"items": [1], "has_more": false, "page_token": "T"}) ; "has_more false")]
#[test_case(json!({"items": [1]}) ; "has_more absent")]
#[test_case(json!({"items": [1], "has_more": 0}) ; "has_more zero")]
fn test_process_response_done(data: JsonValue) {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (page, next) = paginator.process_response(data, &mut state);

    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(page.items(), &[json!(1)]);
}

#[test]
fn test_process_response_missing_cursor() {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (_, next) =
        paginator.process_response(json!({"items": [], "has_more": true, "page_token": null}), &mut state);

    assert_eq!(next, NextPage::MissingCursor);
    assert!(state.done);
}

#[test_case(json!(null) ; "null")]
#[test_case(json!("text") ; "string")]
#[test_case(json!([1, 2]) ; "array")]
fn test_process_response_non_object(data: JsonValue) {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (page, next) = paginator.process_response(data, &mut state);

    assert!(next.is_done());
    assert!(page.items().is_empty());
    assert!(page.as_object().is_empty());
}

#[test]
fn test_page_into_value() {
    let paginator = CursorPaginator::new();
    let mut state = PaginationState::new();

    let (page, _) = paginator.process_response(
        json!({"items": ["a"], "has_more": false, "total": 1}),
        &mut state,
    );

    assert_eq!(JsonValue::from(page), json!({"items": ["a"], "total": 1}));
}

// ============================================================================
// Stream Tests
// ============================================================================

#[tokio::test]
async fn test_paginate_walks_every_page() {
    let (fetcher, calls) = scripted(
        vec![
            json!({"items": ["a", "b"], "has_more": true, "page_token": "T1"}),
            json!({"items": ["c"], "has_more": true, "page_token": "T2"}),
            json!({"items": ["d"], "has_more": false}),
        ],
        None,
    );

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 3);
    let items: Vec<JsonValue> = pages
        .iter()
        .flat_map(|page| page.as_ref().unwrap().items().to_vec())
        .collect();
    assert_eq!(items, vec![json!("a"), json!("b"), json!("c"), json!("d")]);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![None, Some("T1".to_string()), Some("T2".to_string())]
    );
}

#[tokio::test]
async fn test_paginate_is_lazy() {
    let (fetcher, calls) = scripted(
        vec![
            json!({"items": [1], "has_more": true, "page_token": "T1"}),
            json!({"items": [2], "has_more": false}),
        ],
        None,
    );

    let mut stream = paginate(fetcher);
    assert!(calls.lock().unwrap().is_empty());

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.items(), &[json!(1)]);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginate_uses_next_page_token() {
    let (fetcher, calls) = scripted(
        vec![
            json!({"items": [1], "has_more": true, "next_page_token": "N1"}),
            json!({"items": [2], "has_more": false}),
        ],
        None,
    );

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 2);
    assert_eq!(calls.lock().unwrap()[1], Some("N1".to_string()));
}

#[tokio::test]
async fn test_paginate_empty_first_page() {
    let (fetcher, calls) = scripted(vec![json!({"items": [], "has_more": false})], None);

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 1);
    assert!(pages[0].as_ref().unwrap().items().is_empty());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginate_failure_mid_stream() {
    let (fetcher, calls) = scripted(
        vec![
            json!({"items": [1], "has_more": true, "page_token": "T1"}),
            json!({"items": [2], "has_more": true, "page_token": "T2"}),
            json!({"items": [3], "has_more": false}),
        ],
        Some(1),
    );

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].as_ref().unwrap().items(), &[json!(1)]);
    assert!(matches!(
        pages[1],
        Err(Error::HttpStatus { status: 500, .. })
    ));
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_paginate_failure_on_first_page() {
    let (fetcher, _) = scripted(vec![], Some(0));

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_err());
}

#[tokio::test]
async fn test_paginate_missing_cursor_ends_with_error() {
    let (fetcher, calls) = scripted(vec![json!({"items": [1], "has_more": true})], None);

    let pages = drain(paginate(fetcher)).await;

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].as_ref().unwrap().items(), &[json!(1)]);
    assert!(matches!(pages[1], Err(Error::MissingCursor)));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginate_restartable() {
    let script = vec![
        json!({"items": ["a", "b"], "has_more": true, "page_token": "T1"}),
        json!({"items": ["c"], "has_more": false}),
    ];
    let (first, _) = scripted(script.clone(), None);
    let (second, _) = scripted(script, None);

    let one = collect_items(paginate(first)).await.unwrap();
    let two = collect_items(paginate(second)).await.unwrap();

    assert_eq!(one, two);
    assert_eq!(one, vec![json!("a"), json!("b"), json!("c")]);
}

#[tokio::test]
async fn test_paginate_with_custom_response_fields() {
    let paginator = CursorPaginator {
        has_more_field: "more".to_string(),
        cursor_fields: vec!["next".to_string()],
    };
    let (fetcher, calls) = scripted(
        vec![
            json!({"items": [1], "more": true, "next": "C1"}),
            json!({"items": [2], "more": false}),
        ],
        None,
    );

    let pages = drain(paginate_with(fetcher, paginator)).await;

    assert_eq!(pages.len(), 2);
    assert!(pages[0].as_ref().unwrap().get("next").is_none());
    assert_eq!(calls.lock().unwrap()[1], Some("C1".to_string()));
}

// ============================================================================
// collect_items Tests
// ============================================================================

#[tokio::test]
async fn test_collect_items_stops_at_error() {
    let (fetcher, _) = scripted(
        vec![json!({"items": [1], "has_more": true, "page_token": "T1"})],
        Some(1),
    );

    let result = collect_items(paginate(fetcher)).await;

    tokio_test::assert_err!(result);
}

#[tokio::test]
async fn test_collect_items_skips_pages_without_items() {
    let (fetcher, _) = scripted(
        vec![
            json!({"total": 0, "has_more": true, "page_token": "T1"}),
            json!({"items": [7], "has_more": false}),
        ],
        None,
    );

    let items = tokio_test::assert_ok!(collect_items(paginate(fetcher)).await);

    assert_eq!(items, vec![json!(7)]);
}

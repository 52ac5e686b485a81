//! Lazy page streams
//!
//! [`paginate`] turns a single-page fetch into a `Stream` of pages. Nothing
//! is requested until the stream is polled, and each poll issues at most one
//! request. A failed fetch is yielded once as `Err` and ends the stream, so
//! callers can always tell a failure from the end of the data.

use super::types::{CursorPaginator, NextPage, Page, PaginationState};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Stream of pages from one traversal
pub type PageStream = Pin<Box<dyn Stream<Item = Result<Page>> + Send>>;

/// Fetches one page given the cursor (`None` for the first page) and
/// returns the response's `data` value.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, cursor: Option<String>) -> Result<JsonValue>;
}

/// A [`PageFetcher`] backed by a closure
pub struct FnFetcher<F>(F);

/// Wrap a closure as a [`PageFetcher`]
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<JsonValue>> + Send + 'static,
{
    FnFetcher(f)
}

#[async_trait]
impl<F, Fut> PageFetcher for FnFetcher<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<JsonValue>> + Send + 'static,
{
    async fn fetch_page(&self, cursor: Option<String>) -> Result<JsonValue> {
        (self.0)(cursor).await
    }
}

/// The next request always uses `state.cursor`
enum Step {
    Fetch,
    Fail(Error),
    Done,
}

struct Traversal<F> {
    fetcher: F,
    paginator: CursorPaginator,
    state: PaginationState,
}

/// Stream every page of a cursor-paginated listing
pub fn paginate<F>(fetcher: F) -> PageStream
where
    F: PageFetcher + 'static,
{
    paginate_with(fetcher, CursorPaginator::default())
}

/// Stream every page using a custom paginator
pub fn paginate_with<F>(fetcher: F, paginator: CursorPaginator) -> PageStream
where
    F: PageFetcher + 'static,
{
    let traversal = Traversal {
        fetcher,
        paginator,
        state: PaginationState::new(),
    };

    Box::pin(stream::unfold(
        (traversal, Step::Fetch),
        |(mut traversal, step)| async move {
            match step {
                Step::Done => None,
                Step::Fail(err) => Some((Err(err), (traversal, Step::Done))),
                Step::Fetch => match traversal
                    .fetcher
                    .fetch_page(traversal.state.cursor.clone())
                    .await
                {
                    Ok(data) => {
                        let (page, next) =
                            traversal.paginator.process_response(data, &mut traversal.state);
                        debug!(
                            page = traversal.state.pages_fetched,
                            items = page.items().len(),
                            "fetched page"
                        );
                        let step = match next {
                            NextPage::Continue { .. } => Step::Fetch,
                            NextPage::Done => Step::Done,
                            NextPage::MissingCursor => Step::Fail(Error::MissingCursor),
                        };
                        Some((Ok(page), (traversal, step)))
                    }
                    Err(err) => {
                        traversal.state.mark_done();
                        Some((Err(err), (traversal, Step::Done)))
                    }
                },
            }
        },
    ))
}

/// Drain a page stream, concatenating every page's `items`.
///
/// Stops at the first error.
pub async fn collect_items(pages: PageStream) -> Result<Vec<JsonValue>> {
    pages
        .try_fold(Vec::new(), |mut items, page| async move {
            items.extend(page.items().iter().cloned());
            Ok(items)
        })
        .await
}

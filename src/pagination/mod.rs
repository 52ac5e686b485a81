//! Pagination module
//!
//! Cursor pagination for list endpoints: the server returns `has_more` and
//! a `page_token` (or `next_page_token`), and the client passes the token
//! back as the `page_token` query parameter.
//!
//! # Overview
//!
//! [`CursorPaginator`] splits each response into a [`Page`] and the next
//! step; [`paginate`] drives it over a [`PageFetcher`] as a lazy stream.

mod stream;
mod types;

pub use stream::{
    collect_items, fetch_fn, paginate, paginate_with, FnFetcher, PageFetcher, PageStream,
};
pub use types::{
    is_truthy, CursorPaginator, NextPage, Page, PaginationState, PAGINATION_FIELDS,
};

#[cfg(test)]
mod tests;

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # lark-hire
//!
//! A client for the recruitment ("hire") API of the Feishu / Lark open
//! platform: applications, offers, jobs, talents, interviews, referrals and
//! the rest of the hire v1 surface.
//!
//! ## Features
//!
//! - **Catalog-driven**: every endpoint is described once in an embedded YAML
//!   catalog and served by one generic invoker
//! - **Resource namespaces**: `hire.offer().get(..)`, `hire.job().list(..)`
//! - **Lazy pagination**: list endpoints as a `Stream` of pages
//! - **Token management**: tenant access tokens fetched and cached from app
//!   credentials, or supplied per call
//! - **Resilient HTTP**: retries with backoff and token-bucket rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use lark_hire::{Hire, Payload, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let hire = Hire::builder()
//!         .app_credentials("cli_a1b2c3", "secret")
//!         .build()?;
//!
//!     // One call
//!     let offer = hire
//!         .offer()
//!         .get(Payload::new().path("offer_id", "7012345"))
//!         .await?;
//!     println!("{}", offer.data);
//!
//!     // Every page of a listing
//!     let mut pages = hire
//!         .application()
//!         .list_with_iterator(Payload::new().param("page_size", 100));
//!     while let Some(page) = pages.next().await {
//!         for item in page?.items() {
//!             println!("{item}");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Hire  ── resource namespaces (offer(), job(), ...) / v1()   │
//! │  invoke(resource, operation, payload) → ApiResponse          │
//! │  pages(resource, operation, payload)  → Stream<Page>         │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬─────────────┬───┴──────────┬────────────┬──────────┐
//! │ Catalog  │  Payload    │  Template    │   Auth     │   HTTP   │
//! ├──────────┼─────────────┼──────────────┼────────────┼──────────┤
//! │ YAML     │ path/params │ :param →     │ tenant     │ retry    │
//! │ hire v1  │ data/header │ URL segment  │ token cache│ backoff  │
//! │          │ merge       │              │ user token │ rate lim │
//! └──────────┴─────────────┴──────────────┴────────────┴──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
#[allow(missing_docs)]
pub mod error;

/// Common types and type aliases
#[allow(missing_docs)]
pub mod types;

/// Tenant access tokens
pub mod auth;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Client configuration
pub mod config;

/// Endpoint catalog
pub mod catalog;

/// Request payloads and options
#[allow(missing_docs)]
pub mod payload;

/// Response envelope
pub mod envelope;

/// URL path templating
pub mod template;

/// Hire client and resource namespaces
pub mod hire;

/// Command-line interface
#[allow(missing_docs)]
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use envelope::ApiResponse;
pub use hire::{Hire, HireBuilder, Resource};
pub use pagination::{collect_items, Page, PageStream};
pub use payload::{Payload, RequestOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

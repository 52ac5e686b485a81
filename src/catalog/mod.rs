//! API catalog
//!
//! Describes every (resource, operation) pair of an API as data: HTTP
//! method, path template and whether the endpoint is cursor-paginated.
//! The hire v1 catalog is embedded in the binary; custom catalogs can be
//! loaded from YAML files.

mod builtin;
mod loader;
mod types;

pub use builtin::{hire_v1, HIRE_V1_YAML};
pub use loader::{load_catalog, load_catalog_from_str};
pub use types::{ApiCatalog, Endpoint};

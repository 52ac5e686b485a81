//! Catalogs embedded in the binary

use super::loader::load_catalog_from_str;
use super::types::ApiCatalog;
use crate::error::Result;

/// The hire v1 catalog as YAML
pub const HIRE_V1_YAML: &str = include_str!("../../apis/hire_v1.yaml");

/// Parse the embedded hire v1 catalog
pub fn hire_v1() -> Result<ApiCatalog> {
    load_catalog_from_str(HIRE_V1_YAML)
}

//! YAML loader for API catalogs

use super::types::{ApiCatalog, Endpoint};
use crate::error::{Error, Result};
use crate::types::Method;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a catalog from a YAML file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<ApiCatalog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read catalog file '{}': {e}",
            path.display()
        ))
    })?;
    load_catalog_from_str(&content)
}

/// Load a catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<ApiCatalog> {
    let catalog: ApiCatalog = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse catalog YAML: {e}")))?;

    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &ApiCatalog) -> Result<()> {
    if catalog.service.is_empty() {
        return Err(Error::config("Catalog service cannot be empty"));
    }

    if !catalog.base_path.starts_with('/') {
        return Err(Error::config(format!(
            "Catalog base_path must start with '/': {}",
            catalog.base_path
        )));
    }

    if catalog.endpoints.is_empty() {
        return Err(Error::config("Catalog must have at least one endpoint"));
    }

    let mut seen = HashSet::new();
    for endpoint in &catalog.endpoints {
        validate_endpoint(endpoint)?;
        if !seen.insert((endpoint.resource.as_str(), endpoint.operation.as_str())) {
            return Err(Error::config(format!(
                "Duplicate endpoint: {}",
                endpoint.qualified_name()
            )));
        }
    }

    Ok(())
}

fn validate_endpoint(endpoint: &Endpoint) -> Result<()> {
    if endpoint.resource.is_empty() || endpoint.operation.is_empty() {
        return Err(Error::config(format!(
            "Endpoint '{}' needs both a resource and an operation name",
            endpoint.path
        )));
    }

    if !endpoint.path.starts_with('/') {
        return Err(Error::config(format!(
            "Endpoint '{}' path must start with '/': {}",
            endpoint.qualified_name(),
            endpoint.path
        )));
    }

    if endpoint.paginated && !matches!(endpoint.method, Method::GET | Method::POST) {
        return Err(Error::config(format!(
            "Endpoint '{}' is paginated but uses {}",
            endpoint.qualified_name(),
            endpoint.method
        )));
    }

    Ok(())
}

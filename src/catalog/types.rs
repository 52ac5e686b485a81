//! Catalog types

use crate::types::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One API operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Resource group, e.g. `application`
    pub resource: String,
    /// Operation name within the resource, e.g. `list`
    pub operation: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Path template relative to the catalog base path
    pub path: String,
    /// Whether the endpoint pages with `page_token` / `has_more`
    #[serde(default)]
    pub paginated: bool,
}

impl Endpoint {
    /// `resource.operation`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.resource, self.operation)
    }
}

/// A set of endpoints sharing a base path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCatalog {
    /// Service name, e.g. `hire`
    pub service: String,
    /// API version, e.g. `v1`
    #[serde(default = "default_version")]
    pub version: String,
    /// Path prefix shared by every endpoint
    pub base_path: String,
    /// Endpoint definitions
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

fn default_version() -> String {
    "v1".to_string()
}

impl ApiCatalog {
    /// Find an endpoint by resource and operation
    pub fn find(&self, resource: &str, operation: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.resource == resource && e.operation == operation)
    }

    /// Whether the catalog has any endpoint for this resource
    pub fn has_resource(&self, resource: &str) -> bool {
        self.endpoints.iter().any(|e| e.resource == resource)
    }

    /// Distinct resource names, sorted
    pub fn resources(&self) -> Vec<&str> {
        self.endpoints
            .iter()
            .map(|e| e.resource.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Endpoints of one resource, in catalog order
    pub fn operations(&self, resource: &str) -> Vec<&Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| e.resource == resource)
            .collect()
    }

    /// Paginated endpoints, in catalog order
    pub fn paginated(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter().filter(|e| e.paginated)
    }
}

//! Hire client
//!
//! [`Hire`] turns `(resource, operation, payload)` into a request using the
//! API catalog, sends it over a [`Transport`], and unwraps the response
//! envelope. Operations are grouped by resource through [`Resource`]
//! handles (`hire.offer().get(..)`).
//!
//! # Overview
//!
//! - [`Hire::invoke`] - one request, one envelope
//! - [`Hire::pages`] - lazy stream over every page of a list endpoint
//! - [`Hire::resource`] and the generated accessors - resource namespaces
//!
//! Failures are logged with `tracing::error!` and returned unchanged.

mod resource;

pub use resource::Resource;

use crate::auth::{AuthConfig, TokenManager};
use crate::catalog::{hire_v1, ApiCatalog, Endpoint};
use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, HttpClientConfig, Transport};
use crate::pagination::{paginate, PageFetcher, PageStream};
use crate::payload::{format_payload, query_pairs, FormattedPayload, Payload, RequestOptions};
use crate::template::build_url;
use crate::types::{Domain, JsonValue};
use async_trait::async_trait;
use futures::stream;
use std::sync::Arc;
use tracing::{debug, error};

/// Query parameter carrying the pagination cursor
pub const PAGE_TOKEN_PARAM: &str = "page_token";

/// Client for the hire API
#[derive(Clone)]
pub struct Hire {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    tokens: TokenManager,
    catalog: ApiCatalog,
    domain: Domain,
}

impl Hire {
    /// Start building a client
    pub fn builder() -> HireBuilder {
        HireBuilder::default()
    }

    /// Build a client over HTTP from a [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder().config(config)?.build()
    }

    /// The endpoint catalog in use
    pub fn catalog(&self) -> &ApiCatalog {
        &self.inner.catalog
    }

    /// The platform domain
    pub fn domain(&self) -> &Domain {
        &self.inner.domain
    }

    /// The token manager
    pub fn tokens(&self) -> &TokenManager {
        &self.inner.tokens
    }

    /// Same surface under the `v1` name
    pub fn v1(&self) -> &Self {
        self
    }

    /// Base URL of every hire endpoint, e.g. `https://open.feishu.cn/open-apis/hire/v1`
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.inner.domain.base_url(),
            self.inner.catalog.base_path
        )
    }

    /// Call one endpoint and return its envelope.
    ///
    /// A non-zero envelope `code` becomes [`Error::Api`].
    pub async fn invoke(
        &self,
        resource: &str,
        operation: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let result = self
            .try_invoke(resource, operation, payload, options)
            .await;
        if let Err(ref err) = result {
            error!(resource, operation, status = err.status(), error = %err, "hire request failed");
        }
        result
    }

    /// Stream every page of a paginated endpoint.
    ///
    /// Any `page_token` in the payload is ignored; the first request starts
    /// from the beginning. Errors, including an unknown or non-paginated
    /// endpoint, arrive as a single `Err` item that ends the stream.
    pub fn pages(
        &self,
        resource: &str,
        operation: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> PageStream {
        let endpoint = match self.endpoint(resource, operation) {
            Ok(endpoint) if endpoint.paginated => endpoint.clone(),
            Ok(_) => {
                return failed_stream(
                    resource,
                    operation,
                    Error::NotPaginated {
                        resource: resource.to_string(),
                        operation: operation.to_string(),
                    },
                )
            }
            Err(err) => return failed_stream(resource, operation, err),
        };

        let mut formatted = format_payload(payload, options);
        formatted.params.remove(PAGE_TOKEN_PARAM);

        paginate(EndpointPager {
            hire: self.clone(),
            endpoint,
            formatted,
            options: options.clone(),
        })
    }

    /// Operations of one resource
    pub fn resource<'a>(&'a self, name: &'a str) -> Resource<'a> {
        Resource::new(self, name)
    }

    async fn try_invoke(
        &self,
        resource: &str,
        operation: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let endpoint = self.endpoint(resource, operation)?;
        let formatted = format_payload(payload, options);
        self.execute(endpoint, &formatted, options).await
    }

    fn endpoint(&self, resource: &str, operation: &str) -> Result<&Endpoint> {
        self.inner
            .catalog
            .find(resource, operation)
            .ok_or_else(|| Error::unknown_endpoint(resource, operation))
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        formatted: &FormattedPayload,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let url = build_url(&self.api_base(), &endpoint.path, &formatted.path)?;

        let mut request = ApiRequest::new(endpoint.method, url);
        request.query = query_pairs(&formatted.params);
        for (key, value) in &formatted.headers {
            request = request.header(key, value);
        }
        if let Some(ref body) = formatted.data {
            request = request.json(body.clone());
        }

        let request = self
            .inner
            .tokens
            .authorize(
                request,
                options,
                self.inner.transport.as_ref(),
                self.inner.domain.base_url(),
            )
            .await?;

        debug!(
            endpoint = %endpoint.qualified_name(),
            method = %request.method,
            url = %request.url,
            "sending hire request"
        );

        let body = self.inner.transport.send(request).await?;
        ApiResponse::from_value(body)?.into_result()
    }
}

impl std::fmt::Debug for Hire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hire")
            .field("domain", &self.inner.domain)
            .field("tokens", &self.inner.tokens)
            .field("endpoints", &self.inner.catalog.endpoints.len())
            .finish_non_exhaustive()
    }
}

/// One-item stream that logs and yields `err` when first polled
fn failed_stream(resource: &str, operation: &str, err: Error) -> PageStream {
    let (resource, operation) = (resource.to_string(), operation.to_string());
    Box::pin(stream::once(async move {
        error!(%resource, %operation, error = %err, "hire listing failed");
        Err(err)
    }))
}

/// Fetches the pages of one endpoint for one traversal
struct EndpointPager {
    hire: Hire,
    endpoint: Endpoint,
    formatted: FormattedPayload,
    options: RequestOptions,
}

#[async_trait]
impl PageFetcher for EndpointPager {
    async fn fetch_page(&self, cursor: Option<String>) -> Result<JsonValue> {
        let mut formatted = self.formatted.clone();
        if let Some(cursor) = cursor {
            formatted
                .params
                .insert(PAGE_TOKEN_PARAM.to_string(), JsonValue::String(cursor));
        }

        match self
            .hire
            .execute(&self.endpoint, &formatted, &self.options)
            .await
        {
            Ok(response) => Ok(response.into_data()),
            Err(err) => {
                error!(
                    resource = %self.endpoint.resource,
                    operation = %self.endpoint.operation,
                    status = err.status(),
                    error = %err,
                    "hire page request failed"
                );
                Err(err)
            }
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Hire`]
#[derive(Default)]
pub struct HireBuilder {
    transport: Option<Arc<dyn Transport>>,
    http_config: Option<HttpClientConfig>,
    auth: AuthConfig,
    domain: Domain,
    catalog: Option<ApiCatalog>,
    disable_token_cache: bool,
}

impl HireBuilder {
    /// Apply credentials, domain and HTTP settings from a [`ClientConfig`]
    pub fn config(self, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(self
            .auth(config.auth_config())
            .domain(config.domain())
            .disable_token_cache(config.disable_token_cache)
            .http_config(config.http_client_config()))
    }

    /// Send requests through this transport instead of an [`HttpClient`]
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share an existing transport
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Settings for the default [`HttpClient`]
    #[must_use]
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = Some(config);
        self
    }

    /// Set the credentials
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Authenticate as a self-built app
    #[must_use]
    pub fn app_credentials(self, app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        self.auth(AuthConfig::AppCredentials {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        })
    }

    /// Authenticate with a fixed tenant access token
    #[must_use]
    pub fn tenant_token(self, token: impl Into<String>) -> Self {
        self.auth(AuthConfig::TenantToken {
            token: token.into(),
        })
    }

    /// Set the platform domain
    #[must_use]
    pub fn domain(mut self, domain: impl Into<Domain>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Use a custom endpoint catalog
    #[must_use]
    pub fn catalog(mut self, catalog: ApiCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Never fetch tenant tokens automatically
    #[must_use]
    pub fn disable_token_cache(mut self, disable: bool) -> Self {
        self.disable_token_cache = disable;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Hire> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::with_config(
                self.http_config.unwrap_or_default(),
            )?),
        };

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => hire_v1()?,
        };

        let mut tokens = TokenManager::new(self.auth);
        if self.disable_token_cache {
            tokens = tokens.without_cache();
        }

        Ok(Hire {
            inner: Arc::new(Inner {
                transport,
                tokens,
                catalog,
                domain: self.domain,
            }),
        })
    }
}

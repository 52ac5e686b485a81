//! CLI runner - executes commands

use crate::catalog::{hire_v1, load_catalog, ApiCatalog};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::hire::Hire;
use crate::payload::{Payload, RequestOptions};
use futures::StreamExt;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Endpoints {
                resource,
                paginated,
            } => self.endpoints(resource.as_deref(), *paginated),
            Commands::Call {
                resource,
                operation,
                payload,
                user_access_token,
                tenant_key,
            } => {
                let options = request_options(user_access_token.as_deref(), tenant_key.as_deref());
                self.call(resource, operation, payload.as_deref(), &options)
                    .await
            }
            Commands::Pages {
                resource,
                operation,
                payload,
                max_pages,
                items,
                user_access_token,
                tenant_key,
            } => {
                let options = request_options(user_access_token.as_deref(), tenant_key.as_deref());
                self.pages(
                    resource,
                    operation,
                    payload.as_deref(),
                    &options,
                    *max_pages,
                    *items,
                )
                .await
            }
        }
    }

    /// Load the client config: file first, then environment overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load the endpoint catalog
    fn load_catalog(&self) -> Result<ApiCatalog> {
        match &self.cli.catalog {
            Some(path) => load_catalog(path),
            None => hire_v1(),
        }
    }

    fn build_client(&self) -> Result<Hire> {
        let config = self.load_config()?;
        if self.cli.verbose {
            info!(config = ?config, "building client");
        }
        Hire::builder()
            .config(&config)?
            .catalog(self.load_catalog()?)
            .build()
    }

    /// List catalog endpoints
    fn endpoints(&self, resource: Option<&str>, paginated: bool) -> Result<()> {
        let catalog = self.load_catalog()?;

        if let Some(resource) = resource {
            if !catalog.has_resource(resource) {
                return Err(Error::config(format!("Unknown resource: {resource}")));
            }
        }

        let endpoints: Vec<Value> = catalog
            .endpoints
            .iter()
            .filter(|e| resource.is_none_or(|r| e.resource == r))
            .filter(|e| !paginated || e.paginated)
            .map(|e| {
                json!({
                    "resource": e.resource,
                    "operation": e.operation,
                    "method": e.method.to_string(),
                    "path": format!("{}{}", catalog.base_path, e.path),
                    "paginated": e.paginated,
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "ENDPOINTS",
            "service": catalog.service,
            "version": catalog.version,
            "endpoints": endpoints,
        }));

        Ok(())
    }

    /// Call one endpoint
    async fn call(
        &self,
        resource: &str,
        operation: &str,
        payload: Option<&str>,
        options: &RequestOptions,
    ) -> Result<()> {
        let payload = parse_payload(payload)?;
        let hire = self.build_client()?;

        let response = hire.invoke(resource, operation, &payload, options).await?;

        self.output_message(&json!({
            "type": "RESPONSE",
            "resource": resource,
            "operation": operation,
            "response": response,
        }));

        Ok(())
    }

    /// Walk a paginated endpoint
    async fn pages(
        &self,
        resource: &str,
        operation: &str,
        payload: Option<&str>,
        options: &RequestOptions,
        max_pages: Option<usize>,
        items_only: bool,
    ) -> Result<()> {
        let payload = parse_payload(payload)?;
        let hire = self.build_client()?;

        let mut pages = hire
            .pages(resource, operation, &payload, options)
            .take(max_pages.unwrap_or(usize::MAX));

        let mut count = 0usize;
        while let Some(page) = pages.next().await {
            let page = page?;
            count += 1;

            if items_only {
                for item in page.items() {
                    self.output_message(item);
                }
            } else {
                self.output_message(&json!({
                    "type": "PAGE",
                    "page": count,
                    "data": page,
                }));
            }
        }

        if self.cli.verbose {
            info!(resource, operation, pages = count, "listing finished");
        }

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn parse_payload(raw: Option<&str>) -> Result<Payload> {
    match raw {
        Some(raw) => Payload::from_value(serde_json::from_str(raw)?),
        None => Ok(Payload::default()),
    }
}

fn request_options(user_access_token: Option<&str>, tenant_key: Option<&str>) -> RequestOptions {
    let mut options = RequestOptions::new();
    if let Some(token) = user_access_token {
        options = options.with_user_access_token(token);
    }
    if let Some(key) = tenant_key {
        options = options.with_tenant_key(key);
    }
    options
}

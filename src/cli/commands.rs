//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Feishu / Lark hire API
#[derive(Parser, Debug)]
#[command(name = "lark-hire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON); `LARK_*` variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Endpoint catalog file (YAML), instead of the built-in hire v1 catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog endpoints
    Endpoints {
        /// Only this resource
        #[arg(long)]
        resource: Option<String>,

        /// Only paginated endpoints
        #[arg(long)]
        paginated: bool,
    },

    /// Call one endpoint and print the response envelope
    Call {
        /// Resource name, e.g. `offer`
        resource: String,

        /// Operation name, e.g. `get`
        operation: String,

        /// Payload JSON: `{"path": {..}, "params": {..}, "data": {..}}`
        #[arg(short, long)]
        payload: Option<String>,

        /// Act on behalf of a user
        #[arg(long)]
        user_access_token: Option<String>,

        /// Target tenant for store apps
        #[arg(long)]
        tenant_key: Option<String>,
    },

    /// Walk every page of a list endpoint, printing one page per line
    Pages {
        /// Resource name, e.g. `application`
        resource: String,

        /// Operation name
        #[arg(default_value = "list")]
        operation: String,

        /// Payload JSON: `{"path": {..}, "params": {..}, "data": {..}}`
        #[arg(short, long)]
        payload: Option<String>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Print items one per line instead of whole pages
        #[arg(long)]
        items: bool,

        /// Act on behalf of a user
        #[arg(long)]
        user_access_token: Option<String>,

        /// Target tenant for store apps
        #[arg(long)]
        tenant_key: Option<String>,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Endpoints { .. } => "endpoints",
            Self::Call { .. } => "call",
            Self::Pages { .. } => "pages",
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

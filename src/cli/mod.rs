//! CLI module
//!
//! Command-line interface for ad-hoc calls against the hire API.
//!
//! # Commands
//!
//! - `endpoints` - List catalog endpoints
//! - `call` - Call one endpoint and print the envelope
//! - `pages` - Walk every page of a list endpoint

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

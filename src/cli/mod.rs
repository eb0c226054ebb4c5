//! CLI module
//!
//! Command-line interface for the fetch engine.
//!
//! # Commands
//!
//! - `fetch` - Fetch all pages of an endpoint from command-line flags
//! - `run` - Execute a fetch job described in a YAML file

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::Runner;

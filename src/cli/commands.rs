//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginated JSON fetch engine CLI
#[derive(Parser, Debug)]
#[command(name = "pagefetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
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
    /// Fetch all pages of a JSON API endpoint
    Fetch(FetchArgs),

    /// Execute a fetch job described in a YAML file
    Run {
        /// Path to the job file
        job: PathBuf,
    },
}

/// Arguments for the `fetch` subcommand
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Target URL
    pub url: String,

    /// Extra query parameter (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Extra request header (repeatable)
    #[arg(short = 'H', long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Login endpoint URL
    #[arg(long)]
    pub login_url: Option<String>,

    /// JSON payload for the login exchange
    #[arg(long, value_name = "JSON")]
    pub auth_data: Option<String>,

    /// Query parameter name for the page number ("" disables)
    #[arg(long, default_value = "page")]
    pub page_field: String,

    /// Query parameter name for the start-index offset ("" disables)
    #[arg(long, default_value = "")]
    pub start_index_field: String,

    /// Field name for items per page ("" disables)
    #[arg(long, default_value = "per_page")]
    pub per_page_field: String,

    /// Field name for the total item count ("" disables)
    #[arg(long, default_value = "total")]
    pub total_field: String,

    /// Field to extract records from each page ("" uses the whole body)
    #[arg(long, default_value = "data")]
    pub data_field: String,

    /// Items per page to assume when the response omits the field
    #[arg(long)]
    pub per_page: Option<u64>,

    /// Maximum concurrent page requests
    #[arg(short = 'j', long, default_value_t = 5)]
    pub concurrency: usize,

    /// Attempts per page before it is dropped
    #[arg(long, default_value_t = 5)]
    pub retry: u32,

    /// Delay between retry attempts, in seconds
    #[arg(long, default_value_t = 1)]
    pub retry_delay: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Fetch only the first page
    #[arg(long)]
    pub one_page: bool,

    /// Skip SSL certificate verification
    #[arg(long)]
    pub no_verify_ssl: bool,

    /// Flatten each record into a single-level mapping
    #[arg(long)]
    pub flatten: bool,

    /// Advisory rate limit (e.g. 10/1 for ten calls per second)
    #[arg(long, value_name = "CALLS/SECONDS")]
    pub rate_limit: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON record per line
    Json,
    /// Pretty-printed records with a fetch summary
    Pretty,
}

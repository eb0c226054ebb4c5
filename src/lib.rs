//! # pagefetch
//!
//! A concurrent engine for fetching and aggregating paginated JSON APIs.
//!
//! ## Features
//!
//! - **Page discovery**: total-count and per-page metadata from the first
//!   response decide how many pages exist
//! - **Bounded concurrency**: at most `max_concurrency` page requests in
//!   flight at once
//! - **Retry with delay**: transient page failures are retried; pages that
//!   exhaust their budget contribute zero records and surface as a count
//!   shortfall, never as an error
//! - **Login exchange**: optional one-time POST producing a bearer credential
//!   attached to every subsequent request
//! - **Flattening**: optional structural pass collapsing nested records into
//!   single-level mappings with `_`-joined path keys
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagefetch::{FetchConfig, FetchEngine, Result};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = FetchConfig::builder()
//!         .per_page(100)
//!         .max_concurrency(8)
//!         .build()?;
//!
//!     let engine = FetchEngine::new(config)?;
//!     let report = engine
//!         .fetch_all_pages("https://api.example.com/users", &HashMap::new(), false)
//!         .await?;
//!
//!     println!("fetched {} records", report.data.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        FetchEngine                         │
//! │  login (optional) → plan → bounded page workers → report   │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬───────────┬─────┴─────────┬───────────┬─────────┐
//! │   Auth   │   HTTP    │  Pagination   │  Fetcher  │ Flatten │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────┤
//! │ Login    │ GET/POST  │ Plan          │ Retry     │ Path    │
//! │ Bearer   │ Rate Limit│ PageRequest   │ Classify  │ keys    │
//! └──────────┴───────────┴───────────────┴───────────┴─────────┘
//! ```
//!
//! Record order across pages follows completion order and is not
//! guaranteed; within a page, the API's record order is preserved.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the engine
pub mod error;

/// Engine configuration and YAML job files
pub mod config;

/// Login exchange and bearer credential injection
pub mod auth;

/// HTTP transport with advisory rate limiting
pub mod http;

/// Pagination planning and page requests
pub mod pagination;

/// The fetch orchestrator and page workers
pub mod engine;

/// Structural JSON flattening
pub mod flatten;

/// Injected progress reporting
pub mod progress;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::LoginConfig;
pub use config::{FetchConfig, FetchConfigBuilder, JobConfig};
pub use engine::{FetchData, FetchEngine, FetchReport, FetchStats};
pub use error::{Error, Result};
pub use flatten::{flatten_to_value, flatten_value};
pub use progress::{LogProgress, NoopProgress, ProgressReporter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Engine configuration
//!
//! `FetchConfig` is resolved once per engine instance and immutable
//! afterwards. The serde types at the bottom describe the YAML job files
//! consumed by the CLI `run` subcommand.

use crate::auth::LoginConfig;
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for a fetch engine instance
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL joined with relative fetch paths
    pub base_url: Option<String>,
    /// Query parameter name for the 1-based page number
    pub current_page_field: Option<String>,
    /// Query parameter name for the start-index offset
    pub start_index_field: Option<String>,
    /// Response/body field name for items per page
    pub per_page_field: Option<String>,
    /// Response field name for the total item count
    pub total_count_field: Option<String>,
    /// Field (dot path) to extract records from a page body
    pub data_field: Option<String>,
    /// Items per page to assume when the response omits the per-page field
    pub per_page: Option<u64>,
    /// Maximum number of concurrent page requests
    pub max_concurrency: usize,
    /// Attempts per page before it is dropped
    pub retry: u32,
    /// Fixed delay between page retry attempts
    pub retry_delay: Duration,
    /// Fetch only the first page even when more exist
    pub download_one_page_only: bool,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Advisory rate limit hint (best-effort, not a hard guarantee)
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Login exchange configuration
    pub login: Option<LoginConfig>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            current_page_field: Some("page".to_string()),
            start_index_field: None,
            per_page_field: Some("per_page".to_string()),
            total_count_field: Some("total".to_string()),
            data_field: Some("data".to_string()),
            per_page: None,
            max_concurrency: 5,
            retry: 5,
            retry_delay: Duration::from_secs(1),
            download_one_page_only: false,
            verify_ssl: true,
            timeout: Duration::from_secs(60),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("pagefetch/{}", env!("CARGO_PKG_VERSION")),
            login: None,
        }
    }
}

impl FetchConfig {
    /// Create a new config builder
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }

    /// Validate invariants that cannot be expressed in the type system
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::invalid_value(
                "max_concurrency",
                "must be at least 1",
            ));
        }
        if self.retry == 0 {
            return Err(Error::invalid_value("retry", "must be at least 1"));
        }
        if self.per_page == Some(0) {
            return Err(Error::invalid_value("per_page", "must be positive"));
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base)?;
        }
        if let Some(login) = &self.login {
            login.validate()?;
        }
        Ok(())
    }
}

/// Normalize a field name: an empty key disables that pagination style
fn non_empty(name: impl Into<String>) -> Option<String> {
    let name = name.into();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Builder for fetch config
#[derive(Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the current-page query parameter name (empty disables)
    pub fn current_page_field(mut self, name: impl Into<String>) -> Self {
        self.config.current_page_field = non_empty(name);
        self
    }

    /// Set the start-index query parameter name (empty disables)
    pub fn start_index_field(mut self, name: impl Into<String>) -> Self {
        self.config.start_index_field = non_empty(name);
        self
    }

    /// Set the per-page field name (empty disables)
    pub fn per_page_field(mut self, name: impl Into<String>) -> Self {
        self.config.per_page_field = non_empty(name);
        self
    }

    /// Set the total-count field name (empty disables)
    pub fn total_count_field(mut self, name: impl Into<String>) -> Self {
        self.config.total_count_field = non_empty(name);
        self
    }

    /// Set the record extraction field (empty treats the whole body as records)
    pub fn data_field(mut self, name: impl Into<String>) -> Self {
        self.config.data_field = non_empty(name);
        self
    }

    /// Set the assumed items per page
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.config.per_page = Some(per_page);
        self
    }

    /// Set the maximum number of concurrent page requests
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = limit;
        self
    }

    /// Set attempts per page
    pub fn retry(mut self, attempts: u32) -> Self {
        self.config.retry = attempts;
        self
    }

    /// Set the delay between retry attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Fetch only the first page
    pub fn download_one_page_only(mut self, one_page: bool) -> Self {
        self.config.download_one_page_only = one_page;
        self
    }

    /// Toggle SSL certificate verification
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.config.verify_ssl = verify;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the advisory rate limit hint
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Configure the login exchange
    pub fn login(mut self, login: LoginConfig) -> Self {
        self.config.login = Some(login);
        self
    }

    /// Build the config, checking invariants
    pub fn build(self) -> Result<FetchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Job file (YAML) surface
// ============================================================================

/// A fetch job loaded from a YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Target URL to fetch
    pub url: String,

    /// Extra query parameters
    #[serde(default)]
    pub params: HashMap<String, String>,

    /// Flatten each record into a single-level mapping
    #[serde(default)]
    pub flatten: bool,

    /// Login exchange
    #[serde(default)]
    pub login: Option<LoginConfig>,

    /// Pagination field names and sizing
    #[serde(default)]
    pub pagination: PaginationDef,

    /// Maximum concurrent page requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Attempts per page
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Delay between retry attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify SSL certificates
    #[serde(default = "default_true")]
    pub verify_ssl: bool,

    /// Advisory rate limit hint
    #[serde(default)]
    pub rate_limit: Option<RateLimitDef>,

    /// Extra headers for all requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Pagination section of a job file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDef {
    /// Current-page query parameter name ("" disables)
    #[serde(default = "default_page_field")]
    pub current_page_field: String,

    /// Start-index query parameter name ("" disables)
    #[serde(default)]
    pub start_index_field: String,

    /// Per-page field name ("" disables)
    #[serde(default = "default_per_page_field")]
    pub per_page_field: String,

    /// Total-count field name ("" disables)
    #[serde(default = "default_total_field")]
    pub total_count_field: String,

    /// Record extraction field ("" treats the whole body as records)
    #[serde(default = "default_data_field")]
    pub data_field: String,

    /// Assumed items per page
    #[serde(default)]
    pub per_page: Option<u64>,

    /// Fetch only the first page
    #[serde(default)]
    pub one_page_only: bool,
}

impl Default for PaginationDef {
    fn default() -> Self {
        Self {
            current_page_field: default_page_field(),
            start_index_field: String::new(),
            per_page_field: default_per_page_field(),
            total_count_field: default_total_field(),
            data_field: default_data_field(),
            per_page: None,
            one_page_only: false,
        }
    }
}

/// Rate limit section of a job file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitDef {
    /// Allowed calls per period
    pub calls: u32,
    /// Period length in seconds
    pub period_secs: u64,
}

fn default_concurrency() -> usize {
    5
}

fn default_retry() -> u32 {
    5
}

fn default_retry_delay_secs() -> u64 {
    1
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_page_field() -> String {
    "page".to_string()
}

fn default_per_page_field() -> String {
    "per_page".to_string()
}

fn default_total_field() -> String {
    "total".to_string()
}

fn default_data_field() -> String {
    "data".to_string()
}

impl JobConfig {
    /// Load a job from a YAML file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse a job from a YAML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        let job: JobConfig = serde_yaml::from_str(contents)?;
        Ok(job)
    }

    /// Convert the job into an engine config
    pub fn to_fetch_config(&self) -> Result<FetchConfig> {
        let mut builder = FetchConfig::builder()
            .current_page_field(self.pagination.current_page_field.clone())
            .start_index_field(self.pagination.start_index_field.clone())
            .per_page_field(self.pagination.per_page_field.clone())
            .total_count_field(self.pagination.total_count_field.clone())
            .data_field(self.pagination.data_field.clone())
            .download_one_page_only(self.pagination.one_page_only)
            .max_concurrency(self.concurrency)
            .retry(self.retry)
            .retry_delay(Duration::from_secs(self.retry_delay_secs))
            .timeout(Duration::from_secs(self.timeout_secs))
            .verify_ssl(self.verify_ssl);

        if let Some(per_page) = self.pagination.per_page {
            builder = builder.per_page(per_page);
        }
        if let Some(login) = &self.login {
            builder = builder.login(login.clone());
        }
        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(RateLimiterConfig::new(
                limit.calls,
                Duration::from_secs(limit.period_secs),
            ));
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

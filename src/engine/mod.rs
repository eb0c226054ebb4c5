//! Fetch engine
//!
//! Orchestrates one `fetch_all_pages` call: the optional login exchange, the
//! planning request, bounded-concurrency page workers, and aggregation.
//!
//! # Overview
//!
//! - `FetchEngine` - owns the config, HTTP client, and progress sink
//! - `FetchReport` - aggregated data plus delivery statistics
//! - `PageOutcome` - terminal state of one page's handling
//!
//! The concurrency ceiling is a semaphore sized `max_concurrency`: every
//! page becomes a task, but at most that many are past the permit gate at
//! once. Page results funnel back through task join values; the orchestrator
//! is the only aggregator, so no shared collection or lock exists.

mod fetcher;
mod types;

pub use fetcher::{PageFetcher, PageOutcome};
pub use types::{FetchData, FetchReport, FetchStats};

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::flatten::flatten_to_value;
use crate::http::HttpClient;
use crate::pagination::{PageRequest, Plan, Planner};
use crate::progress::{NoopProgress, ProgressReporter};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Engine for fetching and aggregating paginated JSON APIs
pub struct FetchEngine {
    /// Immutable engine configuration
    config: Arc<FetchConfig>,
    /// Shared HTTP client
    client: Arc<HttpClient>,
    /// Injected progress sink
    progress: Arc<dyn ProgressReporter>,
}

impl FetchEngine {
    /// Create an engine from a validated config
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
            progress: Arc::new(NoopProgress),
        })
    }

    /// Replace the progress sink
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// The engine's configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch every page of `url` and aggregate the records.
    ///
    /// Logs in first when a login exchange is configured and no credential
    /// is held yet. When the first response carries no pagination metadata
    /// the raw body is the final result and no page requests are issued.
    /// Pages that exhaust their retries contribute zero records without
    /// failing the call; the shortfall is visible in [`FetchStats`].
    pub async fn fetch_all_pages(
        &self,
        url: &str,
        params: &HashMap<String, String>,
        flatten: bool,
    ) -> Result<FetchReport> {
        let start = Instant::now();

        // Login must complete (or fail) before any page request is issued
        if let Some(auth) = self.client.authenticator() {
            auth.ensure_token().await?;
        }

        let plan = Planner::new(&self.config, &self.client)
            .plan(url, params)
            .await?;

        let (total_pages, per_page, total_count) = match plan {
            Plan::Unpaged(body) => {
                let body = if flatten { flatten_to_value(&body) } else { body };
                let mut stats = FetchStats::new();
                stats.set_duration(start.elapsed().as_millis() as u64);
                return Ok(FetchReport {
                    data: FetchData::Raw(body),
                    stats,
                });
            }
            Plan::Paged {
                total_pages,
                per_page,
                total_count,
            } => (total_pages, per_page, total_count),
        };

        info!(total_count, per_page, total_pages, "Fetching pages");
        self.progress.on_total(total_count);

        let mut stats = FetchStats {
            pages_planned: total_pages,
            records_expected: total_count,
            ..FetchStats::new()
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let abort = Arc::new(AtomicBool::new(false));
        let mut workers: JoinSet<Result<PageOutcome>> = JoinSet::new();

        for page in 1..=total_pages {
            let request = PageRequest::new(page, per_page, params, &self.config);
            let fetcher = PageFetcher::new(
                Arc::clone(&self.config),
                Arc::clone(&self.client),
                Arc::clone(&self.progress),
            );
            let semaphore = Arc::clone(&semaphore);
            let abort = Arc::clone(&abort);
            let url = url.to_string();

            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Ok(PageOutcome::Skipped);
                };
                // A fatal failure in another worker stops pages that have
                // not started; in-flight pages are allowed to finish
                if abort.load(Ordering::Relaxed) {
                    debug!(page = request.page, "Skipping page, fetch is aborting");
                    return Ok(PageOutcome::Skipped);
                }

                let outcome = fetcher.fetch(&url, &request).await;
                if let Err(err) = &outcome {
                    if err.is_fatal() {
                        abort.store(true, Ordering::Relaxed);
                    }
                }
                outcome
            });
        }

        let mut records: Vec<Value> = Vec::new();
        let mut fatal: Option<Error> = None;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(PageOutcome::Success(page_records))) => {
                    stats.add_page(page_records.len() as u64);
                    records.extend(page_records);
                }
                Ok(Ok(PageOutcome::Exhausted)) => stats.add_failed_page(),
                Ok(Ok(PageOutcome::Skipped)) => {}
                Ok(Err(err)) => {
                    if fatal.is_none() {
                        fatal = Some(err);
                    }
                }
                Err(join_err) => {
                    if fatal.is_none() {
                        fatal = Some(Error::Other(format!("page worker panicked: {join_err}")));
                    }
                }
            }
        }

        if let Some(err) = fatal {
            return Err(err);
        }

        if !stats.is_complete() {
            warn!(
                expected = stats.records_expected,
                fetched = stats.records_fetched,
                pages_failed = stats.pages_failed,
                "Fetch delivered fewer records than the API reported"
            );
        }

        if flatten {
            records = records.iter().map(flatten_to_value).collect();
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        debug!(
            records = stats.records_fetched,
            pages = stats.pages_fetched,
            duration_ms = stats.duration_ms,
            "Fetch complete"
        );

        Ok(FetchReport {
            data: FetchData::Records(records),
            stats,
        })
    }
}

impl std::fmt::Debug for FetchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

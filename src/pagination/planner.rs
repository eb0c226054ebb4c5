//! Pagination planner
//!
//! Issues the single planning request and decides how many pages exist.
//! APIs without pagination metadata are a supported, terminal case: the
//! raw body becomes the final result and no page requests are made.

use super::types::Plan;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Computes the fetch plan from the first response's metadata
pub struct Planner<'a> {
    config: &'a FetchConfig,
    client: &'a HttpClient,
}

impl<'a> Planner<'a> {
    /// Create a planner over the engine's config and client
    pub fn new(config: &'a FetchConfig, client: &'a HttpClient) -> Self {
        Self { config, client }
    }

    /// Issue one GET and read the pagination metadata.
    ///
    /// A non-200 here is fatal; this request is never retried. A body
    /// without total-count or a resolvable per-page yields
    /// `Plan::Unpaged` with the raw body.
    pub async fn plan(&self, url: &str, params: &HashMap<String, String>) -> Result<Plan> {
        let response = self.client.get(url, params).await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::data_fetch(status, url));
        }

        let body: Value = response.json().await.map_err(Error::Http)?;

        let total_count = self
            .config
            .total_count_field
            .as_deref()
            .and_then(|field| body.get(field))
            .and_then(Value::as_u64);

        let per_page = self.resolve_per_page(&body, params)?;

        let (Some(total_count), Some(per_page)) = (total_count, per_page) else {
            warn!(url, "Pagination fields missing, returning raw response");
            return Ok(Plan::Unpaged(body));
        };

        let total_pages = if self.config.download_one_page_only {
            1
        } else {
            total_count.div_ceil(per_page)
        };

        debug!(total_count, per_page, total_pages, "Computed fetch plan");
        Ok(Plan::Paged {
            total_pages,
            per_page,
            total_count,
        })
    }

    /// Resolve items per page: a caller-supplied parameter wins, then the
    /// response body, then the configured default. Zero or negative values
    /// are a config error, not a divisor.
    fn resolve_per_page(
        &self,
        body: &Value,
        params: &HashMap<String, String>,
    ) -> Result<Option<u64>> {
        let Some(field) = self.config.per_page_field.as_deref() else {
            return Ok(self.config.per_page);
        };

        let resolved: Option<i64> = params
            .get(field)
            .and_then(|raw| raw.parse::<i64>().ok())
            .or_else(|| body.get(field).and_then(Value::as_i64))
            .or_else(|| self.config.per_page.map(|n| n as i64));

        match resolved {
            Some(n) if n <= 0 => Err(Error::invalid_value(
                field,
                format!("per-page resolved to {n}, must be positive"),
            )),
            Some(n) => Ok(Some(n as u64)),
            None => Ok(None),
        }
    }
}

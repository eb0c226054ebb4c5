//! Pagination types
//!
//! The planner's verdict and the per-page request descriptions built
//! from it.

use crate::config::FetchConfig;
use serde_json::Value;
use std::collections::HashMap;

/// Result of the planning request
#[derive(Debug, Clone)]
pub enum Plan {
    /// Pagination metadata resolved; fan out over this many pages
    Paged {
        /// Number of pages to request
        total_pages: u64,
        /// Resolved items per page
        per_page: u64,
        /// Total item count reported by the API
        total_count: u64,
    },
    /// No pagination metadata; the raw body is the final result
    Unpaged(Value),
}

impl Plan {
    /// Check if this plan fans out over pages
    pub fn is_paged(&self) -> bool {
        matches!(self, Self::Paged { .. })
    }
}

/// One page's request: a 1-based index plus the caller's query parameters
/// merged with the configured pagination fields. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u64,
    /// Query parameters to send, pagination fields included
    pub params: HashMap<String, String>,
}

impl PageRequest {
    /// Build the request for `page`, merging pagination fields into a copy
    /// of the caller-supplied parameters.
    pub fn new(
        page: u64,
        per_page: u64,
        base_params: &HashMap<String, String>,
        config: &FetchConfig,
    ) -> Self {
        let mut params = base_params.clone();
        if let Some(field) = &config.current_page_field {
            params.insert(field.clone(), page.to_string());
        }
        if let Some(field) = &config.start_index_field {
            let offset = (page - 1) * per_page;
            params.insert(field.clone(), offset.to_string());
        }
        Self { page, params }
    }
}

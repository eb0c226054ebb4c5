//! Engine types
//!
//! The aggregated result of one fetch operation and its statistics.

use serde_json::Value;

/// Aggregated data returned by a fetch operation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchData {
    /// Records collected across all pages.
    ///
    /// Order across pages follows completion order and is not guaranteed;
    /// within a page, the API's record order is preserved.
    Records(Vec<Value>),
    /// The raw first response, returned when pagination metadata is absent
    Raw(Value),
}

impl FetchData {
    /// Check if this is an aggregated record set
    pub fn is_records(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    /// Check if this is a raw passthrough body
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// The records, when this is a record set
    pub fn records(&self) -> Option<&[Value]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Raw(_) => None,
        }
    }

    /// Number of records, or 0 for a raw body
    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Raw(_) => 0,
        }
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        match self {
            Self::Records(records) => Value::Array(records),
            Self::Raw(body) => body,
        }
    }
}

/// Result of one fetch operation: the data plus delivery statistics
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Aggregated records or the raw passthrough body
    pub data: FetchData,
    /// Delivery statistics
    pub stats: FetchStats,
}

impl FetchReport {
    /// Check that every planned page delivered its records
    pub fn is_complete(&self) -> bool {
        self.stats.is_complete()
    }
}

/// Statistics from a fetch operation.
///
/// Pages that exhaust their retries contribute zero records without failing
/// the fetch; `records_expected` vs `records_fetched` is the caller's signal
/// for that shortfall.
#[derive(Debug, Clone, Default)]
pub struct FetchStats {
    /// Pages the planner scheduled
    pub pages_planned: u64,
    /// Pages that delivered records
    pub pages_fetched: u64,
    /// Pages dropped after exhausting retries
    pub pages_failed: u64,
    /// Record total reported by the API
    pub records_expected: u64,
    /// Records actually aggregated
    pub records_fetched: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl FetchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page that delivered `records` records
    pub fn add_page(&mut self, records: u64) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Record a page dropped after exhausting retries
    pub fn add_failed_page(&mut self) {
        self.pages_failed += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Check that no page was dropped and the record count matches
    pub fn is_complete(&self) -> bool {
        self.pages_failed == 0 && self.records_fetched == self.records_expected
    }

    /// Records the API reported but the fetch did not deliver
    pub fn shortfall(&self) -> u64 {
        self.records_expected.saturating_sub(self.records_fetched)
    }
}

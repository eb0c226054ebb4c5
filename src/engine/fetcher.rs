//! Page fetch worker
//!
//! One worker handles one page: bounded retry with a fixed delay, outcome
//! classification, and record extraction. A 401/403 is fatal for the whole
//! fetch and surfaces as an error; every other failure is transient and
//! retried until the attempt budget runs out, at which point the page is
//! dropped and contributes zero records.

use crate::config::FetchConfig;
use crate::error::{is_auth_status, Error, Result};
use crate::http::HttpClient;
use crate::pagination::PageRequest;
use crate::progress::ProgressReporter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Terminal state of one page's handling
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page delivered its records
    Success(Vec<Value>),
    /// Every attempt failed; the page contributes zero records
    Exhausted,
    /// The page was never attempted because the fetch is aborting
    Skipped,
}

/// Fetches a single page with retry
pub struct PageFetcher {
    config: Arc<FetchConfig>,
    client: Arc<HttpClient>,
    progress: Arc<dyn ProgressReporter>,
}

impl PageFetcher {
    /// Create a fetcher over the engine's shared config and client
    pub fn new(
        config: Arc<FetchConfig>,
        client: Arc<HttpClient>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            config,
            client,
            progress,
        }
    }

    /// Attempt the page up to `config.retry` times.
    ///
    /// Fatal errors (401/403) propagate immediately; exhausting the attempt
    /// budget is not an error.
    pub async fn fetch(&self, url: &str, request: &PageRequest) -> Result<PageOutcome> {
        let mut remaining = self.config.retry;

        while remaining > 0 {
            match self.attempt(url, request).await {
                Ok(records) => {
                    debug!(page = request.page, count = records.len(), "Page fetched");
                    self.progress.on_records(records.len() as u64);
                    return Ok(PageOutcome::Success(records));
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    remaining -= 1;
                    warn!(page = request.page, remaining, error = %err, "Retrying page");
                    if remaining > 0 {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        warn!(
            page = request.page,
            attempts = self.config.retry,
            "Page dropped after exhausting retries"
        );
        Ok(PageOutcome::Exhausted)
    }

    /// One attempt: issue the GET, classify the status, extract records
    async fn attempt(&self, url: &str, request: &PageRequest) -> Result<Vec<Value>> {
        let response = self.client.get(url, &request.params).await?;
        let status = response.status().as_u16();

        if is_auth_status(status) {
            return Err(Error::AuthenticationFailed { status });
        }
        if status != 200 {
            return Err(Error::Other(format!(
                "page {} returned status {status}",
                request.page
            )));
        }

        // A malformed body on a 200 is transient: retried, then dropped
        let body: Value = response.json().await.map_err(|e| {
            Error::decode(format!("failed to parse page {} body: {e}", request.page))
        })?;
        extract_records(&body, self.config.data_field.as_deref())
    }
}

/// Extract the record set from a page body.
///
/// Without a path the whole body is the record set. Simple dot paths are
/// walked by hand; paths with wildcards go through JSONPath. A missing field
/// yields an empty set, and a non-array value yields a single record.
pub(crate) fn extract_records(body: &Value, path: Option<&str>) -> Result<Vec<Value>> {
    match path {
        Some(path) if path.contains('*') => extract_with_jsonpath(body, path),
        Some(path) => Ok(match extract_simple_path(body, path) {
            Some(Value::Array(items)) => items,
            Some(single) => vec![single],
            None => vec![],
        }),
        None => Ok(match body {
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        }),
    }
}

/// Walk a dot-notation path like "data" or "response.items"
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current.clone())
}

/// Extract using JSONPath for wildcard patterns
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_records_dot_path() {
        let body = json!({"data": [{"id": 1}, {"id": 2}]});
        let records = extract_records(&body, Some("data")).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_records_nested_path() {
        let body = json!({"response": {"items": [{"id": 1}]}});
        let records = extract_records(&body, Some("response.items")).unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_extract_records_missing_field_is_empty() {
        let body = json!({"other": []});
        let records = extract_records(&body, Some("data")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_extract_records_non_array_yields_single_record() {
        let body = json!({"data": {"id": 1}});
        let records = extract_records(&body, Some("data")).unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_extract_records_no_path_uses_whole_body() {
        let body = json!([{"id": 1}, {"id": 2}]);
        let records = extract_records(&body, None).unwrap();
        assert_eq!(records.len(), 2);

        let body = json!({"id": 1});
        let records = extract_records(&body, None).unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_extract_records_wildcard_path() {
        let body = json!({"data": [{"id": 1}, {"id": 2}]});
        let records = extract_records(&body, Some("$.data[*]")).unwrap();
        assert_eq!(records.len(), 2);
    }
}

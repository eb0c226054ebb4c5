//! Error types for pagefetch
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagefetch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Login failed with status {status}")]
    LoginFailed { status: u16 },

    #[error("Failed to fetch data: status {status}, URL: {url}")]
    DataFetchFailed { status: u16, url: String },

    #[error("Authentication failed with status {status}")]
    AuthenticationFailed { status: u16 },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a data fetch error for the planning request
    pub fn data_fetch(status: u16, url: impl Into<String>) -> Self {
        Self::DataFetchFailed {
            status,
            url: url.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Check if this error aborts an entire fetch operation.
    ///
    /// Fatal errors are never retried: a credential rejected on one page is
    /// rejected on every page, and a failed login or planning request leaves
    /// nothing to schedule.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::LoginFailed { .. }
                | Error::DataFetchFailed { .. }
                | Error::AuthenticationFailed { .. }
        )
    }
}

/// Check if an HTTP status marks a page attempt as a credential rejection
pub(crate) fn is_auth_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Result type alias for pagefetch
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("login_url");
        assert_eq!(err.to_string(), "Missing required config field: login_url");

        let err = Error::LoginFailed { status: 401 };
        assert_eq!(err.to_string(), "Login failed with status 401");

        let err = Error::data_fetch(500, "https://api.example.com/users");
        assert_eq!(
            err.to_string(),
            "Failed to fetch data: status 500, URL: https://api.example.com/users"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::config("bad").is_fatal());
        assert!(Error::missing_field("auth_data").is_fatal());
        assert!(Error::LoginFailed { status: 403 }.is_fatal());
        assert!(Error::data_fetch(404, "http://x").is_fatal());
        assert!(Error::AuthenticationFailed { status: 401 }.is_fatal());

        assert!(!Error::decode("bad body").is_fatal());
        assert!(!Error::Other("transient".to_string()).is_fatal());
    }

    #[test]
    fn test_is_auth_status() {
        assert!(is_auth_status(401));
        assert!(is_auth_status(403));
        assert!(!is_auth_status(200));
        assert!(!is_auth_status(404));
        assert!(!is_auth_status(500));
    }
}

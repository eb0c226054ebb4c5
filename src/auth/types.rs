//! Login exchange configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for the one-time login exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Login endpoint URL
    pub url: String,

    /// JSON payload posted to the login endpoint
    #[serde(default)]
    pub payload: Value,

    /// Field (dot path) to extract the bearer token from the response
    #[serde(default = "default_token_field")]
    pub token_field: String,
}

fn default_token_field() -> String {
    "token".to_string()
}

impl LoginConfig {
    /// Create a login config with the default token field
    pub fn new(url: impl Into<String>, payload: Value) -> Self {
        Self {
            url: url.into(),
            payload,
            token_field: default_token_field(),
        }
    }

    /// Override the token extraction field
    #[must_use]
    pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
        self.token_field = field.into();
        self
    }

    /// Check that the exchange can actually be attempted
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::missing_field("login.url"));
        }
        url::Url::parse(&self.url)?;
        if self.payload.is_null() {
            return Err(Error::missing_field("login.payload"));
        }
        if self.token_field.is_empty() {
            return Err(Error::invalid_value("login.token_field", "must be set"));
        }
        Ok(())
    }
}

//! Authenticator implementation
//!
//! Performs the one-time login exchange and injects the resulting bearer
//! credential into subsequent requests. The credential is written at most
//! once per engine lifetime; page workers only ever read it.

use super::types::LoginConfig;
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Handles the login exchange and credential injection
pub struct Authenticator {
    /// Login configuration
    config: LoginConfig,
    /// Bearer token, set once by the first successful login
    token: RwLock<Option<String>>,
    /// HTTP client for the login request
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator with the engine's HTTP client
    pub fn with_client(config: LoginConfig, http_client: Client) -> Self {
        Self {
            config,
            token: RwLock::new(None),
            http_client,
        }
    }

    /// Log in unless a credential is already held.
    ///
    /// Must complete (or fail) before any page request is issued; it is not
    /// safe to call concurrently with fetch workers.
    pub async fn ensure_token(&self) -> Result<()> {
        {
            let token = self.token.read().await;
            if token.is_some() {
                return Ok(());
            }
        }

        let mut token = self.token.write().await;
        // Double-check after acquiring the write lock
        if token.is_some() {
            return Ok(());
        }

        *token = Some(self.login().await?);
        Ok(())
    }

    /// Perform the login exchange. Not retried on failure.
    async fn login(&self) -> Result<String> {
        self.config.validate()?;

        debug!(url = %self.config.url, "Logging in");
        let response = self
            .http_client
            .post(&self.config.url)
            .json(&self.config.payload)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status().as_u16();
        debug!(status, url = %self.config.url, "Login request completed");

        if status != 200 {
            return Err(Error::LoginFailed { status });
        }

        let body: Value = response.json().await.map_err(Error::Http)?;
        let token = extract_token(&body, &self.config.token_field).ok_or_else(|| {
            Error::auth(format!(
                "Could not extract token from field: {}",
                self.config.token_field
            ))
        })?;

        info!(status, "Login successful");
        Ok(token)
    }

    /// Attach the bearer credential to a request, when one is held
    pub async fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().await;
        match token.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Check whether a credential is held
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Get the current login config
    pub fn config(&self) -> &LoginConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("url", &self.config.url)
            .finish_non_exhaustive()
    }
}

/// Extract a token from a response body using a simple dot path
/// like "token" or "auth.access_token"
fn extract_token(value: &Value, path: &str) -> Option<String> {
    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_token_top_level() {
        let body = json!({"token": "abc123"});
        assert_eq!(extract_token(&body, "token"), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_nested() {
        let body = json!({"auth": {"access_token": "xyz"}});
        assert_eq!(
            extract_token(&body, "auth.access_token"),
            Some("xyz".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let body = json!({"user": "alice"});
        assert_eq!(extract_token(&body, "token"), None);
    }

    #[test]
    fn test_extract_token_non_scalar() {
        let body = json!({"token": {"inner": true}});
        assert_eq!(extract_token(&body, "token"), None);
    }
}

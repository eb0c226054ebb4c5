//! HTTP transport
//!
//! A thin layer over reqwest that owns the connection settings (timeout,
//! user agent, SSL verification), merges default headers, attaches the
//! bearer credential, and paces requests through the advisory rate limiter.
//!
//! The client is deliberately single-shot: it issues one GET or POST and
//! returns the response whatever the status. Retry policy and status
//! classification belong to the page fetcher, which owns those decisions.

use super::rate_limit::RateLimiter;
use crate::auth::Authenticator;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// HTTP client shared by the planner, the authenticator, and all page workers
pub struct HttpClient {
    client: Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    authenticator: Option<Arc<Authenticator>>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Build a client from the engine config
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(Error::Http)?;

        if !config.verify_ssl {
            debug!("SSL verification is disabled for all requests");
        }

        let authenticator = config
            .login
            .as_ref()
            .map(|login| Arc::new(Authenticator::with_client(login.clone(), client.clone())));

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_headers: config.default_headers.clone(),
            authenticator,
            rate_limiter,
        })
    }

    /// The authenticator, when a login exchange is configured
    pub fn authenticator(&self) -> Option<&Arc<Authenticator>> {
        self.authenticator.as_ref()
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Issue a single GET with query parameters. Returns the response for
    /// any status; the caller classifies.
    pub async fn get(&self, url: &str, query: &HashMap<String, String>) -> Result<Response> {
        let mut req = self.request(Method::GET, url).await;
        if !query.is_empty() {
            req = req.query(query);
        }
        let response = req.send().await.map_err(Error::Http)?;
        debug!(status = response.status().as_u16(), url, "GET completed");
        Ok(response)
    }

    /// Issue a single POST with a JSON body
    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Response> {
        let req = self.request(Method::POST, url).await;
        let response = req.json(body).send().await.map_err(Error::Http)?;
        debug!(status = response.status().as_u16(), url, "POST completed");
        Ok(response)
    }

    /// Prepare a request: rate-limit pacing, default headers, credential
    async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method, self.build_url(url));
        for (key, value) in &self.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(auth) = &self.authenticator {
            req = auth.apply(req).await;
        }
        req
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

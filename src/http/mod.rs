//! HTTP transport module
//!
//! Provides the shared request layer and the advisory rate limiter.
//!
//! # Features
//!
//! - **Single-shot requests**: one GET/POST per call, callers classify status
//! - **Rate Limiting**: token bucket pacing using governor (best-effort)
//! - **Credential injection**: integration with the auth module

mod client;
mod rate_limit;

pub use client::HttpClient;
pub use rate_limit::{RateLimiter, RateLimiterConfig};

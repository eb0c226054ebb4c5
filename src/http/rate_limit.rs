//! Advisory rate limiting
//!
//! Uses the governor crate for token bucket rate limiting. The limiter is
//! awaited before each request; it smooths request pacing on a best-effort
//! basis and is not a hard upstream guarantee.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Rate limit hint: allowed calls per period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Number of calls allowed per period
    pub calls: u32,
    /// Period over which calls are counted
    pub period: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            calls: 10,
            period: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(calls: u32, period: Duration) -> Self {
        Self { calls, period }
    }

    /// Convenience constructor for calls-per-second limits
    pub fn per_second(calls: u32) -> Self {
        Self::new(calls, Duration::from_secs(1))
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let calls = NonZeroU32::new(config.calls).unwrap_or(NonZeroU32::new(1).unwrap());
        // One token replenished every period/calls, burst up to a full period
        let replenish = config.period.checked_div(calls.get()).unwrap_or_default();
        let quota = Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(calls))
            .allow_burst(calls);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Wait with a timeout
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.limiter.until_ready())
            .await
            .is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.calls, 10);
        assert_eq!(config.period, Duration::from_secs(1));
    }

    #[test]
    fn test_rate_limiter_config_per_second() {
        let config = RateLimiterConfig::per_second(25);
        assert_eq!(config.calls, 25);
        assert_eq!(config.period, Duration::from_secs(1));
    }

    #[test]
    fn test_rate_limiter_allows_burst() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(5, Duration::from_secs(1)));

        // A full period's worth of calls is available immediately
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_rate_limiter_wait() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(100));
        tokio_test::block_on(limiter.wait());
    }

    #[test]
    fn test_rate_limiter_wait_with_timeout() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(100));
        let result = tokio_test::block_on(limiter.wait_with_timeout(Duration::from_millis(100)));
        assert!(result);
    }

    #[test]
    fn test_rate_limiter_zero_calls_does_not_panic() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, Duration::from_secs(1)));
        assert!(limiter.try_acquire());
    }
}

//! Per-client token bucket for the credential endpoints.
//!
//! Each source address gets `max_requests` attempts as a burst, refilled at
//! one attempt per `window / max_requests`. Addresses whose bucket is full
//! again are dropped every `cleanup_interval` checks, and the number of
//! tracked addresses is capped at `max_tracked_ips`.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota};
use tracing::{debug, warn};

use super::AuthError;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    pub cleanup_interval: u64,
    pub max_tracked_ips: usize,
}

impl Default for RateLimitConfig {
    /// Ten attempts per address every fifteen minutes.
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
            cleanup_interval: 100,
            max_tracked_ips: 10_000,
        }
    }
}

pub struct RateLimiter {
    config: RateLimitConfig,
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    request_count: AtomicU64,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            config,
            limiter: governor::RateLimiter::keyed(quota),
            request_count: AtomicU64::new(0),
        }
    }

    /// Records an attempt from `ip`.
    ///
    /// # Errors
    /// `AuthError::RateLimitExceeded` once `ip` has used up its bucket, or
    /// while the tracking table is full.
    pub fn check(&self, ip: IpAddr) -> Result<(), AuthError> {
        let count = self.request_count.fetch_add(1, Ordering::Relaxed);
        if count > 0 && count % self.config.cleanup_interval.max(1) == 0 {
            debug!(request_count = count, "Running periodic rate limiter cleanup");
            self.cleanup();
        }

        if self.limiter.len() >= self.config.max_tracked_ips {
            self.cleanup();
            if self.limiter.len() >= self.config.max_tracked_ips {
                warn!(ip = %ip, tracked_ips = self.limiter.len(), "Rejecting attempt, tracking table full");
                return Err(AuthError::RateLimitExceeded);
            }
        }

        self.limiter.check_key(&ip).map_err(|_| {
            warn!(ip = %ip, max = self.config.max_requests, "Rate limit exceeded");
            AuthError::RateLimitExceeded
        })
    }

    /// Drops addresses whose bucket has refilled completely.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    #[must_use]
    pub fn tracked_ips(&self) -> usize {
        self.limiter.len()
    }
}

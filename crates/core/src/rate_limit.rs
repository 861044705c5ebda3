//! Per-caller rate limiting
//!
//! Sliding window limiter: each caller key may perform at most
//! `max_requests` operations within any trailing `window`.
//!
//! # Example
//!
//! ```rust
//! use calorie_core::rate_limit::{RateLimiter, RateLimitConfig};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(10));
//!
//! if limiter.try_acquire("203.0.113.7") {
//!     // Proceed with the lookup
//! } else {
//!     // Reject with "too many requests"
//! }
//! ```

use crate::config::RateLimitSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Requests per minute used when the configured limit is zero
const FALLBACK_PER_MINUTE: u32 = 2;

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(10)
    }
}

impl RateLimitConfig {
    /// Create a limit over an arbitrary window
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Per-minute rate limit (zero falls back to a minimal limit of 2)
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        let max_requests = if max == 0 { FALLBACK_PER_MINUTE } else { max };
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self::per_minute(settings.per_minute)
    }
}

/// Request timestamps per caller, plus when stale callers were last dropped
struct Windows {
    callers: HashMap<String, Vec<Instant>>,
    last_sweep: Instant,
}

/// Sliding window rate limiter keyed by caller
///
/// Callers with no requests left in the window are dropped at most once per
/// window, so the table only holds recently active callers.
pub struct RateLimiter {
    windows: RwLock<Windows>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: RwLock::new(Windows {
                callers: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            config,
        }
    }

    /// Get the limiter configuration
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Try to acquire permission, recording the request when granted
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        let mut windows = self.windows.write().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if now.saturating_duration_since(windows.last_sweep) >= self.config.window {
            let span = self.config.window;
            windows.callers.retain(|_, window| {
                Self::evict_stale(window, now, span);
                !window.is_empty()
            });
            windows.last_sweep = now;
        }

        let window = windows.callers.entry(key.to_string()).or_default();
        Self::evict_stale(window, now, self.config.window);

        if window.len() < self.config.max_requests as usize {
            window.push(now);
            true
        } else {
            false
        }
    }

    /// Get rate limit status for a key
    #[must_use]
    pub fn status(&self, key: &str) -> RateLimitStatus {
        let mut windows = self.windows.write().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let (used, oldest) = match windows.callers.get_mut(key) {
            Some(window) => {
                Self::evict_stale(window, now, self.config.window);
                (window.len(), window.first().copied())
            }
            None => (0, None),
        };

        let limit = self.config.max_requests;
        let retry_after = if used >= limit as usize {
            oldest.map(|t| (t + self.config.window).saturating_duration_since(now))
        } else {
            None
        };

        RateLimitStatus {
            used: u32::try_from(used).unwrap_or(u32::MAX),
            limit,
            retry_after,
        }
    }

    /// Number of callers currently tracked
    #[must_use]
    pub fn tracked_callers(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .callers
            .len()
    }

    fn evict_stale(window: &mut Vec<Instant>, now: Instant, span: Duration) {
        // Saturating subtraction avoids a panic shortly after boot
        let Some(cutoff) = now.checked_sub(span) else {
            return;
        };
        window.retain(|&t| t > cutoff);
    }
}

/// Rate limit status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    /// Requests counted in the current window
    pub used: u32,
    /// Maximum requests per window
    pub limit: u32,
    /// Time until the next request would be accepted, when exhausted
    pub retry_after: Option<Duration>,
}

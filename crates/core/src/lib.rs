//! Core utilities for the calorie counter
//!
//! This crate provides shared functionality used by the lookup pipeline and its front ends:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Caching**: Bounded LRU store with optional expiry for upstream responses
//! - **Rate limiting**: Sliding-window limiter keyed by caller
//! - **Configuration**: TOML-based configuration with environment overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use calorie_core::{cache::{BoundedCache, CacheConfig}, config::Config};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let cache: BoundedCache<String> = BoundedCache::new(CacheConfig::from(&config.schema.cache));
//!
//! cache.put("search::apple::25", "cached".to_string());
//! assert!(cache.get("search::apple::25").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod rate_limit;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{BoundedCache, CacheConfig, CacheStats};
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
}

//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Default FoodData Central search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.nal.usda.gov/fdc/v1/foods/search";

/// Default FoodData Central detail endpoint; `{}` receives the food id
pub const DEFAULT_FOOD_DETAIL_URL: &str = "https://api.nal.usda.gov/fdc/v1/food/{}";

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Upstream nutrition database
    #[serde(default)]
    pub fooddata: FoodDataSettings,

    /// Bearer token issuance
    #[serde(default)]
    pub auth: AuthSettings,

    /// Per-caller request limits
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Upstream response cache
    #[serde(default)]
    pub cache: CacheSettings,
}

/// FoodData Central connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodDataSettings {
    /// API key (`USDA_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search endpoint (`USDA_SEARCH_URL`)
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Detail endpoint template (`USDA_FOOD_DETAIL`)
    #[serde(default = "default_food_detail_url")]
    pub food_detail_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of candidates requested per search
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FoodDataSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            search_url: default_search_url(),
            food_detail_url: default_food_detail_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_food_detail_url() -> String {
    DEFAULT_FOOD_DETAIL_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}

/// Longest accepted token lifetime, one year
pub const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Longest accepted cache entry lifetime, one year
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 3600;

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    /// HMAC secret for signing tokens (`JWT_SECRET`)
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in minutes (`ACCESS_TOKEN_EXPIRE_MINUTES`)
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

fn default_token_ttl_minutes() -> u64 {
    30
}

/// Rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Requests per caller per minute (`RATE_LIMIT_PER_MINUTE`)
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_minute: default_per_minute(),
        }
    }
}

fn default_per_minute() -> u32 {
    10
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of cached upstream responses (`CALORIE_CACHE_CAPACITY`)
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entry lifetime in seconds, 0 = no expiry (`CALORIE_CACHE_TTL_SECS`)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_capacity() -> usize {
    1000
}

fn default_ttl_secs() -> u64 {
    24 * 3600
}

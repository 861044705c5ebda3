//! Configuration for the FoodData Central client
//!
//! Built from the shared settings file or straight from the environment.

use crate::error::{ApiError, ApiResult};
use calorie_core::config::{DEFAULT_FOOD_DETAIL_URL, DEFAULT_SEARCH_URL, FoodDataSettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Search endpoint
    pub search_url: String,
    /// Detail endpoint; `{}` receives the food id, otherwise the id is appended as a path segment
    pub food_detail_url: String,
    /// API key sent as the `api_key` query parameter
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Candidates requested per search
    pub page_size: u32,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            food_detail_url: DEFAULT_FOOD_DETAIL_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            page_size: 25,
        }
    }
}

impl From<&FoodDataSettings> for ClientConfig {
    fn from(settings: &FoodDataSettings) -> Self {
        Self {
            search_url: settings.search_url.clone(),
            food_detail_url: settings.food_detail_url.clone(),
            api_key: settings.api_key.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            page_size: settings.page_size,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `USDA_API_KEY`: API key (required)
    /// - `USDA_SEARCH_URL`: Search endpoint (optional)
    /// - `USDA_FOOD_DETAIL`: Detail endpoint template (optional)
    pub fn from_env() -> ApiResult<Self> {
        let api_key = env::var("USDA_API_KEY").map_err(|_| ApiError::missing_env("USDA_API_KEY"))?;

        let mut config = Self::default().with_api_key(api_key);
        if let Ok(url) = env::var("USDA_SEARCH_URL") {
            config.search_url = url;
        }
        if let Ok(url) = env::var("USDA_FOOD_DETAIL") {
            config.food_detail_url = url;
        }

        Ok(config)
    }

    /// Builder-style method to set the search endpoint
    #[must_use]
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Builder-style method to set the detail endpoint template
    #[must_use]
    pub fn with_food_detail_url(mut self, url: impl Into<String>) -> Self {
        self.food_detail_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Detail URL for one food id
    #[must_use]
    pub fn food_detail_url_for(&self, fdc_id: i64) -> String {
        if self.food_detail_url.contains("{}") {
            self.food_detail_url.replacen("{}", &fdc_id.to_string(), 1)
        } else {
            format!("{}/{fdc_id}", self.food_detail_url.trim_end_matches('/'))
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [
            ("search_url", &self.search_url),
            ("food_detail_url", &self.food_detail_url),
        ] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{name} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ApiError::missing_env("USDA_API_KEY"));
        }

        Ok(())
    }
}

//! Request-level entry point: rate limit, authenticate, validate, resolve.

use crate::resolve::{CalorieEstimate, Resolver};
use crate::source::{CachingSource, FoodSource};
use calorie_auth::{AuthError, TokenIssuer, parse_bearer};
use calorie_core::cache::CacheConfig;
use calorie_core::config::Config;
use calorie_core::rate_limit::{RateLimitConfig, RateLimiter};
use fooddata_client::{ClientConfig, FoodDataClient};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Source label reported with every estimate
pub const SOURCE_LABEL: &str = "USDA FoodData Central";

/// Longest accepted dish name, in characters
pub const MAX_DISH_NAME_CHARS: usize = 100;

/// Calorie lookup request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieRequest {
    /// Free-text dish name
    pub dish_name: String,
    /// Number of servings
    pub servings: u32,
}

impl CalorieRequest {
    /// Create a request
    pub fn new(dish_name: impl Into<String>, servings: u32) -> Self {
        Self {
            dish_name: dish_name.into(),
            servings,
        }
    }

    /// Check the request, returning the trimmed dish name
    pub fn validate(&self) -> Result<&str, ServiceError> {
        let dish_name = self.dish_name.trim();
        if dish_name.is_empty() {
            return Err(ServiceError::Invalid("Dish name cannot be empty".to_string()));
        }
        if dish_name.chars().count() > MAX_DISH_NAME_CHARS {
            return Err(ServiceError::Invalid(format!(
                "Dish name cannot be longer than {MAX_DISH_NAME_CHARS} characters"
            )));
        }
        if self.servings == 0 {
            return Err(ServiceError::Invalid(
                "servings must be a positive integer".to_string(),
            ));
        }
        Ok(dish_name)
    }
}

/// Ingredient text of the matched record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientBreakdown {
    /// Ingredient list as printed on the label
    pub ingredients: String,
}

/// Calorie lookup response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieResponse {
    /// Description of the matched food
    pub dish_name: String,
    /// Servings requested
    pub servings: u32,
    /// Calories in one serving
    pub calories_per_serving: f64,
    /// Calories for all servings
    pub total_calories: f64,
    /// Data source label
    pub source: String,
    /// Present when the matched record lists ingredients
    pub ingredient_breakdown: Option<IngredientBreakdown>,
    /// FoodData Central id of the matched record
    pub fdc_id: Option<i64>,
}

impl CalorieResponse {
    /// Build the response for an estimate
    #[must_use]
    pub fn from_estimate(estimate: CalorieEstimate, servings: u32) -> Self {
        Self {
            dish_name: estimate.description,
            servings,
            calories_per_serving: estimate.calories_per_serving,
            total_calories: estimate.total_calories,
            source: SOURCE_LABEL.to_string(),
            ingredient_breakdown: estimate
                .ingredients
                .filter(|i| !i.is_empty())
                .map(|ingredients| IngredientBreakdown { ingredients }),
            fdc_id: estimate.fdc_id,
        }
    }
}

/// Request rejection, each with an HTTP-equivalent status
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller exceeded its per-minute allowance
    #[error("Too many requests. Limit is {limit}/minute.")]
    RateLimited {
        /// Allowed requests per window
        limit: u32,
        /// Whole seconds until the caller's oldest request leaves the window
        retry_after_secs: u64,
    },

    /// Missing, malformed, invalid or expired credentials
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Request failed validation
    #[error("{0}")]
    Invalid(String),

    /// No estimate for the dish
    #[error("Dish not found or nutrition info unavailable")]
    NotFound,
}

impl ServiceError {
    /// HTTP-equivalent status code
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::Unauthorized(_) => 401,
            Self::Invalid(_) => 422,
            Self::NotFound => 404,
        }
    }
}

/// Authenticated, rate-limited calorie lookups
pub struct CalorieService<S> {
    resolver: Resolver<S>,
    issuer: TokenIssuer,
    limiter: RateLimiter,
}

impl CalorieService<CachingSource<FoodDataClient>> {
    /// Wire the live client, cache, token issuer and limiter from configuration
    pub fn from_config(config: &Config) -> calorie_core::Result<Self> {
        let schema = &config.schema;
        config.require_api_key()?;
        config.require_jwt_secret()?;

        let client = FoodDataClient::with_config(ClientConfig::from(&schema.fooddata))?;
        let source = CachingSource::new(client, CacheConfig::from(&schema.cache));
        let resolver = Resolver::new(source).with_page_size(schema.fooddata.page_size);
        let issuer = TokenIssuer::from_settings(&schema.auth)?;
        let limiter = RateLimiter::new(RateLimitConfig::from(&schema.rate_limit));

        Ok(Self::new(resolver, issuer, limiter))
    }
}

impl<S: FoodSource> CalorieService<S> {
    /// Assemble a service from its parts
    pub fn new(resolver: Resolver<S>, issuer: TokenIssuer, limiter: RateLimiter) -> Self {
        Self {
            resolver,
            issuer,
            limiter,
        }
    }

    /// The resolver behind the service
    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }

    /// Token issuer shared with the login flow
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Look up calories for `request` on behalf of `caller`
    ///
    /// `caller` keys the rate limit (typically the client address);
    /// `authorization` is the raw `Authorization` header value.
    pub async fn get_calories(
        &self,
        caller: &str,
        authorization: Option<&str>,
        request: &CalorieRequest,
    ) -> Result<CalorieResponse, ServiceError> {
        if !self.limiter.try_acquire(caller) {
            let status = self.limiter.status(caller);
            let retry_after_secs = status
                .retry_after
                .map_or(0, |d| d.as_secs() + u64::from(d.subsec_nanos() > 0));
            warn!(
                caller = %caller,
                limit = status.limit,
                retry_after_secs,
                tracked_callers = self.limiter.tracked_callers(),
                "Rate limit exceeded"
            );
            return Err(ServiceError::RateLimited {
                limit: status.limit,
                retry_after_secs,
            });
        }

        let token = parse_bearer(authorization)?;
        let claims = self.issuer.verify(token)?;
        debug!(subject = %claims.sub, "Request authenticated");

        let dish_name = request.validate()?;

        let estimate = self
            .resolver
            .resolve(dish_name, request.servings)
            .await
            .ok_or(ServiceError::NotFound)?;

        Ok(CalorieResponse::from_estimate(estimate, request.servings))
    }
}

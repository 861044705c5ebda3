//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{FoodsApi, SearchApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// FoodData Central API client
///
/// A thin wrapper over `reqwest` with a fixed per-request timeout and
/// request correlation IDs. Failed requests are not retried.
#[derive(Clone)]
pub struct FoodDataClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl FoodDataClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("fooddata-client/0.3"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the search endpoint
    #[must_use]
    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.clone())
    }

    /// Access the food detail endpoint
    #[must_use]
    pub fn foods(&self) -> FoodsApi {
        FoodsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP
    // -------------------------------------------------------------------------

    /// GET an absolute URL with the API key and extra query parameters
    #[instrument(skip(self, params), fields(request_id))]
    pub async fn get_url<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let start = Instant::now();

        let result = self
            .inner
            .get(url)
            .header(X_REQUEST_ID, &request_id)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(request_id = %request_id, url = %url, "Request timed out");
                return Err(ApiError::Timeout(self.config.timeout));
            }
            Err(e) => {
                warn!(request_id = %request_id, url = %url, error = %e, "Request failed");
                return Err(ApiError::Request(e));
            }
        };

        let outcome = self.handle_response(response).await;
        debug!(
            request_id = %request_id,
            elapsed_ms = elapsed_ms(start.elapsed()),
            ok = outcome.is_ok(),
            "Request finished"
        );
        outcome
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout)
                } else {
                    ApiError::Request(e)
                }
            })?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Upstream returned an error status");
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::default().with_api_key("DEMO_KEY");
        let client = FoodDataClient::with_config(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_missing_key() {
        let client = FoodDataClient::with_config(ClientConfig::default());
        assert!(matches!(client, Err(ApiError::MissingEnvVar(_))));
    }
}

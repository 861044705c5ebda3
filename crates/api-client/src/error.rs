//! Error types for the FoodData Central client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, or a placeholder when unreadable
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, when the server answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the upstream service could not be reached or answered badly,
    /// as opposed to the client being misconfigured
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::MissingEnvVar(_))
    }
}

impl From<ApiError> for calorie_core::Error {
    fn from(err: ApiError) -> Self {
        use calorie_core::ErrorCode;

        let message = err.to_string();
        match err {
            ApiError::Config(msg) => Self::config(msg),
            ApiError::MissingEnvVar(_) => Self::new(ErrorCode::MissingSetting, message),
            ApiError::Json(_) => Self::new(ErrorCode::MalformedResponse, message),
            ApiError::Timeout(_) => Self::new(ErrorCode::Timeout, message),
            ApiError::Request(_) | ApiError::ApiResponse { .. } => Self::upstream(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(ApiError::api_response(503, "down").status(), Some(503));
        assert_eq!(ApiError::Timeout(Duration::from_secs(30)).status(), None);
    }

    #[test]
    fn test_is_upstream() {
        assert!(ApiError::api_response(500, "boom").is_upstream());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_upstream());
        assert!(!ApiError::config("bad url").is_upstream());
        assert!(!ApiError::missing_env("USDA_API_KEY").is_upstream());
    }

    #[test]
    fn test_into_core_error() {
        let core: calorie_core::Error = ApiError::config("bad url").into();
        assert_eq!(core.code, calorie_core::ErrorCode::ConfigError);

        let core: calorie_core::Error = ApiError::api_response(502, "bad gateway").into();
        assert_eq!(core.code, calorie_core::ErrorCode::UpstreamError);
    }
}

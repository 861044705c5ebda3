//! Error types for the auth crate.

use thiserror::Error;

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while issuing or checking bearer tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was sent
    #[error("Authorization header missing")]
    MissingHeader,

    /// Header present but not of the form `Bearer <token>`
    #[error("Invalid authorization header")]
    InvalidHeader,

    /// Token is malformed or its signature does not verify
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token signature is valid but its expiry has passed
    #[error("Token expired")]
    Expired,

    /// Signing key unusable
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Token lifetime cannot be represented
    #[error("Token lifetime out of range: {0} minutes")]
    InvalidLifetime(u64),

    /// Claims could not be encoded
    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl AuthError {
    pub(crate) fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken(reason.into())
    }

    /// Whether the caller should be told to authenticate again
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingHeader | Self::InvalidHeader | Self::InvalidToken(_) | Self::Expired
        )
    }
}

impl From<AuthError> for calorie_core::Error {
    fn from(err: AuthError) -> Self {
        let code = if err.is_unauthorized() {
            calorie_core::ErrorCode::UnauthorizedAccess
        } else {
            calorie_core::ErrorCode::SecurityError
        };
        Self::new(code, err.to_string())
    }
}

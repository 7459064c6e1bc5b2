//! API error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("No token provided")]
    MissingCredential,

    #[error("Invalid or expired token")]
    InvalidCredential,

    #[error("Invalid credentials")]
    InvalidLogin,

    #[error("Credential type not found")]
    UnknownCredentialType,

    /// The resource store or verification machinery failed while the gate
    /// was deciding. Surfaced identically to an invalid token so callers
    /// cannot distinguish a broken backend from a bad credential.
    #[error("Invalid or expired token")]
    Upstream(#[source] anyhow::Error),

    // 403 Forbidden
    #[error("Access to resource not found")]
    ResourceUnresolved,

    #[error("Access denied to resource")]
    AccessDenied,

    // 404 Not Found
    #[error("{0} not found")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,

            Self::MissingCredential
            | Self::InvalidCredential
            | Self::InvalidLogin
            | Self::UnknownCredentialType
            | Self::Upstream(_) => StatusCode::UNAUTHORIZED,

            Self::ResourceUnresolved | Self::AccessDenied => StatusCode::FORBIDDEN,

            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

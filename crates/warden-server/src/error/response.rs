//! Error response implementation.

use super::types::ApiError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error response body. Every error renders as `{"message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(source) => {
                // Fail-closed: the detail stays in the logs, the caller sees
                // the same body as an invalid token.
                error!(error = %source, "Upstream failure during authorization");
            }
            ApiError::Internal(source) => {
                error!(error = %source, "Internal server error");
            }
            ApiError::Database(source) => {
                error!(error = %source, "Database error");
            }
            ApiError::MissingCredential
            | ApiError::InvalidCredential
            | ApiError::InvalidLogin
            | ApiError::ResourceUnresolved
            | ApiError::AccessDenied => {
                warn!(error = %self, "Request rejected");
            }
            _ => {}
        }

        let status = self.status_code();
        let body = ErrorResponse {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

// Conversion implementations
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Record".into()),
            _ => ApiError::Database(err),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        // Bad signature, malformed payload and expiry all collapse to a
        // single outcome at the authorization boundary.
        ApiError::InvalidCredential
    }
}

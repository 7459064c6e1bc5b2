//! Identity extractors for handlers.

use super::types::AuthUser;
use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extractor for the authenticated user (required).
pub struct Auth(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(Auth)
            .ok_or(ApiError::MissingCredential)
    }
}

/// Extractor for an optional authenticated user.
pub struct MaybeAuth(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<AuthUser>().cloned()))
    }
}

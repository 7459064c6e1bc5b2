//! Route configuration for the Warden API server.

use crate::{
    config::CorsConfig,
    handlers::users,
    middleware::access::{AccessControl, AccessLayer},
    state::AppState,
};
use axum::{
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router.
///
/// Every route except login sits behind the authorization gate; the gate
/// itself decides per request whether the mapped resource admits the
/// caller.
pub fn create_router(state: AppState) -> Router {
    let access = AccessLayer::new(Arc::new(AccessControl::new(
        state.config.auth.jwt_secret.clone(),
        state.resources.clone(),
    )));

    let public = Router::new().route("/user/login", post(users::login));

    let protected = Router::new()
        .route("/user/create", post(users::create))
        .route("/users", get(users::list))
        .route(
            "/user/:id",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete)
                .patch(users::restore),
        )
        .route_layer(access);

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(fallback_handler)
        .layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "message": "The requested resource was not found"
        })),
    )
}

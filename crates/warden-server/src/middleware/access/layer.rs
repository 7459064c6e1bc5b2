//! Authorization gate middleware layer.

use super::{
    evaluator::has_access,
    resolver::resolve,
    token::{decode_token, extract_token},
    types::AuthUser,
};
use crate::db::repositories::ResourceRepository;
use crate::error::ApiError;
use axum::{
    body::Body,
    http::{Method, Request},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// The authorization decision engine shared across requests.
///
/// Holds the signing secret and the resource store handle; both are
/// read-only, so a single instance serves any number of concurrent
/// requests without coordination.
pub struct AccessControl {
    jwt_secret: String,
    resources: Arc<dyn ResourceRepository>,
}

impl AccessControl {
    /// Create an access controller over the given resource store.
    pub fn new(jwt_secret: impl Into<String>, resources: Arc<dyn ResourceRepository>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            resources,
        }
    }

    /// Run the full authorization decision for one request.
    ///
    /// Terminal outcomes, first reached wins: missing token, invalid
    /// token, unresolved resource, denied, authorized. Unexpected
    /// failures in the resource store are logged and collapsed into the
    /// invalid-token outcome so internal breakage is indistinguishable
    /// from a bad credential.
    pub async fn authorize(
        &self,
        token: Option<String>,
        method: &Method,
        path: &str,
    ) -> Result<AuthUser, ApiError> {
        let token = token.ok_or(ApiError::MissingCredential)?;
        let claims = decode_token(&token, &self.jwt_secret)?;

        let resource = match resolve(self.resources.as_ref(), method, path).await {
            Ok(resource) => resource,
            Err(err) => {
                warn!(method = %method, path = %path, "Resource resolution failed");
                return Err(ApiError::Upstream(err));
            }
        };
        let resource = resource.ok_or(ApiError::ResourceUnresolved)?;

        if !has_access(&claims, &resource) {
            warn!(
                subject = %claims.sub,
                role_id = %claims.role_id,
                resource = %resource.resource.name,
                "Access denied"
            );
            return Err(ApiError::AccessDenied);
        }

        AuthUser::from_claims(claims).ok_or(ApiError::InvalidCredential)
    }
}

/// Authorization layer configuration.
#[derive(Clone)]
pub struct AccessLayer {
    control: Arc<AccessControl>,
}

impl AccessLayer {
    /// Create a layer around a shared access controller.
    pub fn new(control: Arc<AccessControl>) -> Self {
        Self { control }
    }
}

impl<S> Layer<S> for AccessLayer {
    type Service = AccessMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessMiddleware {
            inner,
            control: self.control.clone(),
        }
    }
}

/// Authorization middleware service.
#[derive(Clone)]
pub struct AccessMiddleware<S> {
    inner: S,
    control: Arc<AccessControl>,
}

impl<S> Service<Request<Body>> for AccessMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let control = self.control.clone();
        let mut inner = self.inner.clone();

        let token = extract_token(req.headers());
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        Box::pin(async move {
            match control.authorize(token, &method, &path).await {
                Ok(auth_user) => {
                    req.extensions_mut().insert(auth_user);
                    inner.call(req).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AccessRule, Resource, ResourceWithRules};
    use crate::middleware::access::{encode_token, Claims, LEVEL_ROLE};
    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    const SECRET: &str = "test_secret_key_32_chars_long!!!";

    /// One-entry resource store; optionally failing to exercise the
    /// fail-closed path.
    struct SingleResource {
        resource: Option<ResourceWithRules>,
        fail: bool,
    }

    #[async_trait]
    impl ResourceRepository for SingleResource {
        async fn find_active_resource(
            &self,
            method: &str,
            module: &str,
            controller: &str,
            action: &str,
        ) -> anyhow::Result<Option<ResourceWithRules>> {
            if self.fail {
                anyhow::bail!("resource store unreachable");
            }
            Ok(self.resource.clone().filter(|r| {
                r.resource.api_method == method
                    && r.resource.module == module
                    && r.resource.controller == controller
                    && r.resource.action == action
            }))
        }
    }

    fn processor_resource() -> ResourceWithRules {
        let id = Uuid::new_v4();
        ResourceWithRules {
            resource: Resource {
                id,
                name: "User Management".into(),
                kind: "api".into(),
                api_method: "GET".into(),
                module: "default".into(),
                controller: "users".into(),
                action: "index".into(),
                status: 1,
                dt_created: Utc::now(),
            },
            rules: vec![AccessRule {
                id: Uuid::new_v4(),
                resource_id: id,
                level: LEVEL_ROLE,
                value: "PROCESSOR".into(),
                status: 1,
            }],
        }
    }

    fn control(resource: Option<ResourceWithRules>, fail: bool) -> AccessControl {
        AccessControl::new(SECRET, Arc::new(SingleResource { resource, fail }))
    }

    fn bearer(role_id: &str) -> Option<String> {
        let claims = Claims::new(Uuid::new_v4(), role_id, 3600);
        Some(encode_token(&claims, SECRET).unwrap())
    }

    #[tokio::test]
    async fn missing_token_is_terminal() {
        let control = control(Some(processor_resource()), false);
        let err = control
            .authorize(None, &Method::GET, "/users")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let control = control(Some(processor_resource()), false);
        let err = control
            .authorize(Some("not.a.jwt".into()), &Method::GET, "/users")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential));
    }

    #[tokio::test]
    async fn unmapped_path_is_unresolved() {
        let control = control(None, false);
        let err = control
            .authorize(bearer("PROCESSOR"), &Method::GET, "/users")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ResourceUnresolved));
    }

    #[tokio::test]
    async fn role_mismatch_is_denied() {
        let control = control(Some(processor_resource()), false);
        let err = control
            .authorize(bearer("GUEST"), &Method::GET, "/users")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn matching_role_is_authorized() {
        let control = control(Some(processor_resource()), false);
        let user = control
            .authorize(bearer("PROCESSOR"), &Method::GET, "/users")
            .await
            .unwrap();
        assert_eq!(user.role_id, "PROCESSOR");
    }

    #[tokio::test]
    async fn store_failure_fails_closed() {
        let control = control(Some(processor_resource()), true);
        let err = control
            .authorize(bearer("ADMIN"), &Method::GET, "/users")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
        assert_eq!(err.to_string(), "Invalid or expired token");
    }
}

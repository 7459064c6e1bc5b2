//! Maps an HTTP method and URL path to a stored resource definition.
//!
//! Paths follow a `(module, controller, action)` convention. Identifier
//! segments (canonical UUID shape) are ignored, and the remaining segments
//! produce an ordered list of candidate keys, from the most specific
//! interpretation down to the `default` module catch-alls. The first
//! candidate with an active resource wins.

use crate::db::models::ResourceWithRules;
use crate::db::repositories::ResourceRepository;
use axum::http::Method;
use once_cell::sync::Lazy;
use regex::Regex;

/// Module name assumed when the path does not name one.
pub const DEFAULT_MODULE: &str = "default";
/// Controller/action name assumed when the path does not name one.
pub const INDEX: &str = "index";

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("invalid UUID segment regex")
});

/// A `(module, controller, action)` convention key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    /// Module name.
    pub module: String,
    /// Controller name.
    pub controller: String,
    /// Action name.
    pub action: String,
}

impl RouteKey {
    fn new(module: &str, controller: &str, action: &str) -> Self {
        Self {
            module: module.to_string(),
            controller: controller.to_string(),
            action: action.to_string(),
        }
    }
}

/// Split a path into convention segments.
///
/// Drops the query string, empty segments, and any segment matching the
/// canonical UUID textual shape (those are embedded record identifiers,
/// not part of the convention key).
pub fn path_segments(path: &str) -> Vec<&str> {
    let path = path.split('?').next().unwrap_or("");
    path.split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| !UUID_SEGMENT.is_match(s))
        .collect()
}

/// Generate the ordered candidate keys for a segment list.
///
/// The ordering is a deliberate tie-break: for a single extra segment, a
/// module-level catch-all is preferred over a controller-level or
/// action-level interpretation. Externally configured resource tables
/// rely on this order.
pub fn candidate_keys(segments: &[&str]) -> Vec<RouteKey> {
    match segments {
        [] => vec![RouteKey::new(DEFAULT_MODULE, INDEX, INDEX)],
        [a] => vec![
            RouteKey::new(a, INDEX, INDEX),
            RouteKey::new(DEFAULT_MODULE, a, INDEX),
            RouteKey::new(DEFAULT_MODULE, INDEX, a),
        ],
        [a, b] => vec![
            RouteKey::new(a, b, INDEX),
            RouteKey::new(DEFAULT_MODULE, a, b),
        ],
        // Trailing segments beyond the third are ignored.
        [a, b, c, ..] => vec![RouteKey::new(a, b, c)],
    }
}

/// Resolve a method and path to an active resource with its rules.
///
/// Candidates are looked up sequentially; the first hit wins and later
/// candidates are never tried. Returns `Ok(None)` when no candidate
/// matches.
pub async fn resolve(
    repo: &dyn ResourceRepository,
    method: &Method,
    path: &str,
) -> anyhow::Result<Option<ResourceWithRules>> {
    let segments = path_segments(path);
    for key in candidate_keys(&segments) {
        let found = repo
            .find_active_resource(method.as_str(), &key.module, &key.controller, &key.action)
            .await?;
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AccessRule, Resource};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    fn key(module: &str, controller: &str, action: &str) -> RouteKey {
        RouteKey::new(module, controller, action)
    }

    #[test]
    fn segments_drop_query_string_and_empties() {
        assert_eq!(path_segments("/user/create?debug=1"), vec!["user", "create"]);
        assert_eq!(path_segments("//user///create/"), vec!["user", "create"]);
        assert_eq!(path_segments("/"), Vec::<&str>::new());
        assert_eq!(path_segments(""), Vec::<&str>::new());
    }

    #[test]
    fn segments_drop_uuid_shaped_identifiers() {
        let id = "0c894b78-236e-4dbf-8bb9-f841f24502d9";
        assert_eq!(path_segments(&format!("/user/{id}")), vec!["user"]);
        assert_eq!(
            path_segments(&format!("/{id}/user/{}/create", id.to_uppercase())),
            vec!["user", "create"]
        );
        // Not the canonical 8-4-4-4-12 shape: kept as ordinary segments.
        assert_eq!(
            path_segments("/user/0c894b78236e4dbf8bb9f841f24502d9"),
            vec!["user", "0c894b78236e4dbf8bb9f841f24502d9"]
        );
        assert_eq!(
            path_segments("/user/0c894b78-236e-4dbf-8bb9"),
            vec!["user", "0c894b78-236e-4dbf-8bb9"]
        );
    }

    #[test]
    fn candidates_for_empty_path() {
        assert_eq!(candidate_keys(&[]), vec![key("default", "index", "index")]);
    }

    #[test]
    fn candidates_for_one_segment() {
        assert_eq!(
            candidate_keys(&["user"]),
            vec![
                key("user", "index", "index"),
                key("default", "user", "index"),
                key("default", "index", "user"),
            ]
        );
    }

    #[test]
    fn candidates_for_two_segments() {
        assert_eq!(
            candidate_keys(&["user", "create"]),
            vec![
                key("user", "create", "index"),
                key("default", "user", "create"),
            ]
        );
    }

    #[test]
    fn candidates_for_three_or_more_segments() {
        assert_eq!(
            candidate_keys(&["admin", "user", "create"]),
            vec![key("admin", "user", "create")]
        );
        // Trailing segments are ignored.
        assert_eq!(
            candidate_keys(&["admin", "user", "create", "extra", "more"]),
            vec![key("admin", "user", "create")]
        );
    }

    /// Repository stub recording the lookup order and answering from a
    /// fixed table.
    struct StubRepo {
        table: Vec<(String, RouteKey)>,
        seen: Mutex<Vec<RouteKey>>,
    }

    impl StubRepo {
        fn with(table: Vec<(&str, RouteKey)>) -> Self {
            Self {
                table: table
                    .into_iter()
                    .map(|(m, k)| (m.to_string(), k))
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResourceRepository for StubRepo {
        async fn find_active_resource(
            &self,
            method: &str,
            module: &str,
            controller: &str,
            action: &str,
        ) -> anyhow::Result<Option<ResourceWithRules>> {
            let candidate = RouteKey::new(module, controller, action);
            self.seen.lock().unwrap().push(candidate.clone());
            let hit = self
                .table
                .iter()
                .any(|(m, k)| m == method && *k == candidate);
            Ok(hit.then(|| ResourceWithRules {
                resource: Resource {
                    id: Uuid::new_v4(),
                    name: format!("{module}/{controller}/{action}"),
                    kind: "api".into(),
                    api_method: method.to_string(),
                    module: module.to_string(),
                    controller: controller.to_string(),
                    action: action.to_string(),
                    status: 1,
                    dt_created: Utc::now(),
                },
                rules: Vec::<AccessRule>::new(),
            }))
        }
    }

    #[tokio::test]
    async fn resolve_prefers_module_interpretation() {
        // Both the module-level and controller-level interpretations
        // exist; the module-level one must win.
        let repo = StubRepo::with(vec![
            ("GET", key("user", "index", "index")),
            ("GET", key("default", "user", "index")),
        ]);

        let found = resolve(&repo, &Method::GET, "/user").await.unwrap().unwrap();
        assert_eq!(found.resource.module, "user");
        assert_eq!(found.resource.controller, "index");

        // The second candidate is never tried once the first succeeds.
        assert_eq!(repo.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolve_falls_through_in_order() {
        let repo = StubRepo::with(vec![("POST", key("default", "user", "create"))]);

        let found = resolve(&repo, &Method::POST, "/user/create")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.resource.module, "default");
        assert_eq!(found.resource.controller, "user");
        assert_eq!(found.resource.action, "create");

        let seen = repo.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![key("user", "create", "index"), key("default", "user", "create")]
        );
    }

    #[tokio::test]
    async fn resolve_strips_identifier_before_matching() {
        let repo = StubRepo::with(vec![("GET", key("default", "user", "index"))]);

        let found = resolve(
            &repo,
            &Method::GET,
            "/user/0c894b78-236e-4dbf-8bb9-f841f24502d9",
        )
        .await
        .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn resolve_returns_none_when_nothing_matches() {
        let repo = StubRepo::with(vec![]);

        let found = resolve(&repo, &Method::GET, "/no/such/thing").await.unwrap();
        assert!(found.is_none());

        // The single three-segment candidate was tried.
        assert_eq!(repo.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolve_is_method_sensitive() {
        let repo = StubRepo::with(vec![("POST", key("default", "user", "create"))]);

        let found = resolve(&repo, &Method::GET, "/user/create").await.unwrap();
        assert!(found.is_none());
    }
}

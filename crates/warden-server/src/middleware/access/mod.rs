//! Database-driven access control.
//!
//! Incoming requests carry a bearer JWT; the URL path and HTTP method are
//! mapped to a stored resource definition through a
//! `(module, controller, action)` convention, and the resource's access
//! rules decide whether the caller may proceed. On success the decoded
//! identity is attached to the request for downstream handlers.

mod evaluator;
mod extractor;
mod layer;
mod resolver;
mod token;
mod types;

pub use evaluator::{has_access, LEVEL_OWNER, LEVEL_ROLE};
pub use extractor::{Auth, MaybeAuth};
pub use layer::{AccessControl, AccessLayer, AccessMiddleware};
pub use resolver::{candidate_keys, path_segments, resolve, RouteKey};
pub use token::{decode_token, encode_token, extract_token};
pub use types::{AuthUser, Claims, SUPER_ROLE};

//! Middleware for the Warden API server.

pub mod access;

pub use access::{
    candidate_keys, has_access, AccessControl, AccessLayer, AccessMiddleware, Auth, AuthUser,
    Claims, MaybeAuth, RouteKey, SUPER_ROLE,
};

//! Database access for the Warden API server.
//!
//! Connection pooling and migrations follow the usual sqlx setup; all
//! query logic lives behind the narrow repository traits in
//! [`repositories`] so the access-control core and the handlers never
//! touch SQL directly.

pub mod audit;
pub mod migration;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod seed;

pub use audit::{AuditEntry, AuditSink, PgAuditLog};
pub use migration::run_migrations;
pub use models::{AccessRule, Resource, ResourceWithRules, User};
pub use pool::{create_pool, verify_connection};
pub use repositories::{
    PgResourceRepository, PgUserRepository, ResourceRepository, UserRepository,
};

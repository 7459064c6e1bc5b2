//! Shared application state.

use crate::config::ServerConfig;
use crate::db::{
    self, audit::AuditSink, repositories::ResourceRepository, repositories::UserRepository,
    PgAuditLog, PgResourceRepository, PgUserRepository,
};
use anyhow::Result;
use std::sync::Arc;

/// State shared by all request handlers and the authorization gate.
///
/// Storage is held behind the repository traits so tests (or another
/// engine) can substitute implementations without touching handlers or
/// the gate.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resource definitions store.
    pub resources: Arc<dyn ResourceRepository>,
    /// User accounts store.
    pub users: Arc<dyn UserRepository>,
    /// Audit trail sink.
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Connect to the database, run migrations and build the state.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let pool = db::create_pool(&config.database).await?;
        db::run_migrations(&pool).await?;

        Ok(Self {
            config: Arc::new(config.clone()),
            resources: Arc::new(PgResourceRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            audit: Arc::new(PgAuditLog::new(pool)),
        })
    }
}

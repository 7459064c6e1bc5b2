//! Warden Seed Binary
//!
//! Applies migrations and inserts the default roles, bootstrap admin,
//! resource table and audit categories. Safe to re-run.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden_server::config::ServerConfig;
use warden_server::db;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    db::seed::seed_defaults(&pool).await?;

    info!("Database seeded");
    Ok(())
}

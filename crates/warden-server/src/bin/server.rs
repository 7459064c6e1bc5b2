//! Warden Server Binary

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    info!("Starting Warden Server v{}", env!("CARGO_PKG_VERSION"));

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}

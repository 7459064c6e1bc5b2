//! Warden API Server
//!
//! An API server built around a database-driven authorization gate:
//! requests are mapped to stored resource definitions through a
//! `(module, controller, action)` URL convention, and role/owner access
//! rules decide whether the bearer of the presented token may proceed.
//!
//! # Architecture
//!
//! The server is built on Axum and follows a layered architecture:
//!
//! - **Routes**: HTTP endpoint definitions
//! - **Handlers**: Request processing logic
//! - **Middleware**: The authorization gate and identity extractors
//! - **Repositories**: Data access layer behind narrow traits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Server builder for constructing and running the API server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration.
    pub async fn new(config: ServerConfig) -> Result<Self, anyhow::Error> {
        if let Err(errors) = config::validate_config(&config) {
            let details = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("Invalid configuration: {details}");
        }

        let state = AppState::new(&config).await?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Run the server, binding to the configured address.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr).await?;

        info!("Server listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get the server's socket address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

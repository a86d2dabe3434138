//! # svrlab-server
//!
//! HTTP front end for the SVR training pipeline: `GET /health`,
//! `POST /api/v1/upload-info` and `POST /api/v1/train-svr`, all answering
//! with the `{success, message, data, error}` envelope.

pub mod cli;
pub mod config;

mod api;
mod envelope;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use envelope::ApiResponse;
pub use error::ServerError;

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config.address().parse()?;
    info!(
        app = %config.app_name,
        version = %config.app_version,
        address = %addr,
        max_file_size = config.max_file_size,
        cors_origins = ?config.cors_origins,
        "server starting"
    );

    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "listening");

    let shutdown_signal = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received, stopping server gracefully"),
            Err(e) => warn!(error = %e, "failed to install ctrl+c handler"),
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("server shut down cleanly");
    Ok(())
}

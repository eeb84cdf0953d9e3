// ---------------------------------------------------------------------------
// Status page server
// ---------------------------------------------------------------------------
//
// Serves the container listing over HTTP and answers sibling probes.

mod error;
mod routes;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::inventory::ContainerInventory;
use crate::orchestrator::Orchestrator;

/// Application state shared by all request handlers. Constructed once at
/// process start; the Docker client behind `inventory` is reused across
/// requests.
pub struct AppState {
    pub config: AppConfig,
    pub inventory: Arc<dyn ContainerInventory>,
    pub orchestrator: Orchestrator,
}

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    routes::build_router(state)
}

/// Start the server and block until shutdown (Ctrl+C).
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let listen_addr = state.config.listen_addr;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("serving status page on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}

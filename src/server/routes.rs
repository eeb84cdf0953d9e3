// ---------------------------------------------------------------------------
// Route registration and handlers
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::error::PageError;
use super::AppState;
use crate::probe::PROBE_MARKER_HEADER;
use crate::view;
use crate::VERSION;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// The status page: one orchestration per request, no caching.
///
/// Requests carrying the probe marker are answered immediately with a
/// minimal liveness body, before any Docker call. Without the
/// short-circuit, a portscope instance listed by another (or by itself
/// through a chained deployment) would recursively trigger full
/// orchestrations.
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    if headers.contains_key(PROBE_MARKER_HEADER) {
        tracing::debug!("answering probe-marker request with liveness ack");
        return Ok(Html("ok".to_string()));
    }

    let containers = state.inventory.list_running_containers().await?;
    let summaries = state
        .orchestrator
        .orchestrate(
            containers,
            &state.config.external_hostname,
            &state.config.self_container_id,
        )
        .await;

    Ok(Html(view::render_page(
        &summaries,
        &state.config.external_hostname,
        VERSION,
    )))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness endpoint, intentionally minimal.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

// ---------------------------------------------------------------------------
// Request error types
// ---------------------------------------------------------------------------

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::inventory::InventoryError;
use crate::view;

/// Errors a page request can fail with. Probe failures never appear here;
/// they are downgraded inside the prober. Only the container inventory is
/// a hard dependency.
#[derive(Debug)]
pub enum PageError {
    /// 502 Bad Gateway — the Docker daemon was unreachable or errored.
    Inventory(InventoryError),
}

impl From<InventoryError> for PageError {
    fn from(err: InventoryError) -> Self {
        PageError::Inventory(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Inventory(err) => {
                tracing::error!("container inventory failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Html(view::render_error_page(&err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Inventory(err) => write!(f, "inventory failure: {err}"),
        }
    }
}

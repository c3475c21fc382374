//! Common routes: liveness, diagnostics, health, version.

use crate::handlers::{diagnostics, health, root, version};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /, GET /test, GET /health, GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(diagnostics))
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(state)
}

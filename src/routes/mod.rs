//! Router assembly.

mod catalog;
mod common;

pub use catalog::catalog_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: all routes with CORS open to any origin, a body size limit and request tracing.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(catalog_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

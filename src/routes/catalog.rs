//! Catalog and order routes.

use crate::handlers::{create_order, list_trees, seed_trees};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/seed", post(seed_trees))
        .route("/trees", get(list_trees))
        .route("/orders", post(create_order))
        .with_state(state)
}

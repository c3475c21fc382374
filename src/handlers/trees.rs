//! Tree catalog handlers.

use crate::error::AppError;
use crate::response::{ok, SeedSummary};
use crate::service::{CatalogService, SeedOutcome};
use crate::state::AppState;
use axum::extract::State;

/// GET /trees — every tree with its public `id`.
pub async fn list_trees(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let trees = CatalogService::list_trees(state.store()?).await?;
    Ok(ok(trees))
}

/// POST /seed — insert the sample trees once.
pub async fn seed_trees(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let summary = match CatalogService::seed_trees(state.store()?).await? {
        SeedOutcome::AlreadySeeded(count) => SeedSummary {
            message: "Already seeded",
            count,
        },
        SeedOutcome::Seeded(count) => SeedSummary { message: "Seeded", count },
    };
    Ok(ok(summary))
}

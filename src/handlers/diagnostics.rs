//! Liveness and store diagnostics. Flags only; nothing here fails the request.

use crate::response::Message;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthBody {
    pub status: &'static str,
}

#[derive(Serialize, Debug)]
pub struct DiagnosticsBody {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

const MAX_LISTED_COLLECTIONS: usize = 10;

/// GET /
pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Christmas Trees API running".into(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// GET /version
pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn flag(set: bool) -> String {
    let flag = if set { "Set" } else { "Not Set" };
    flag.to_string()
}

/// GET /test — store connectivity and configuration flags.
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsBody> {
    let mut body = DiagnosticsBody {
        backend: "Running".into(),
        database: "Not Available".into(),
        database_url: flag(state.settings.database_url.is_some()),
        database_name: flag(state.settings.database_name_set),
        connection_status: "Not Connected".into(),
        collections: Vec::new(),
    };
    if let Some(store) = &state.store {
        body.database = "Available".into();
        body.connection_status = "Connected".into();
        match store.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                body.collections = names;
                body.database = format!("Connected & Working ({})", store.name());
            }
            Err(e) => {
                let msg: String = e.to_string().chars().take(50).collect();
                tracing::warn!(error = %e, "diagnostics could not list collections");
                body.database = format!("Connected but Error: {}", msg);
            }
        }
    }
    Json(body)
}

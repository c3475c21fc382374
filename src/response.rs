//! Response bodies and status helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}

/// Result of `POST /seed`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub message: &'static str,
    pub count: u64,
}

/// Result of `POST /orders`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub message: &'static str,
    pub order_id: String,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

//! Order placement handler. Body: `{"order": {...}}`.

use crate::error::AppError;
use crate::response::{created, OrderReceipt};
use crate::schema::{Order, Schema, ValidationError, ViolationKind};
use crate::service::OrderService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

fn order_from_body(body: &Value) -> Result<Order, AppError> {
    let Some(body) = body.as_object() else {
        return Err(ValidationError::single("$", ViolationKind::WrongType { expected: "object" }).into());
    };
    let order = body.get("order").unwrap_or(&Value::Null);
    Ok(Order::from_value(order, "order")?)
}

/// POST /orders — validate, check tree references, store the order.
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Json(body) = payload?;
    let order = order_from_body(&body)?;
    let store = state.store()?;
    let order_id = OrderService::place_order(store, &order).await?;
    Ok(created(OrderReceipt {
        message: "Order placed",
        order_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_order_key_is_a_violation_on_order() {
        let err = order_from_body(&json!({ "customer_name": "x" })).unwrap_err();
        match err {
            AppError::Validation(e) => {
                assert_eq!(e.fields(), vec!["order"]);
                assert_eq!(e.violations[0].kind, ViolationKind::Missing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(matches!(order_from_body(&json!([1])), Err(AppError::Validation(_))));
    }
}

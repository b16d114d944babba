//! REST API router for the order-entry service.
//!
//! Used by the binary and by integration tests. Create with [`create_router`].
//! Uses Extension for state so the router is `Router<()>` and works with
//! `into_make_service()`.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::coordinator::OrderCoordinator;
use crate::error::OrderError;
use crate::types::{Fund, OrderId};

/// Shared app state: one coordinator per process.
#[derive(Clone)]
pub struct AppState {
    pub(crate) coordinator: Arc<OrderCoordinator>,
}

/// Builds the REST router with state. Returns `Router<()>` so you can call
/// `.into_make_service()` for `axum::serve`.
pub fn create_router(coordinator: Arc<OrderCoordinator>) -> Router<()> {
    let state = AppState { coordinator };
    Router::new()
        .route("/health", get(health))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/:id/cancel", post(cancel_order))
        .route("/api/funds", get(list_funds))
        .layer(Extension(state))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    fund_name: String,
    transaction_type: String,
    quantity: Decimal,
}

/// POST /api/orders: create, then submit to the downstream venue, so the
/// response carries the order's terminal state. A downstream failure
/// answers 500 with the record already parked Failed in the store.
async fn create_order(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Response {
    let order = match state
        .coordinator
        .create_order(&body.fund_name, &body.transaction_type, body.quantity)
        .await
    {
        Ok(order) => order,
        Err(e) => return error_response(e),
    };
    match state.coordinator.submit_for_execution(&order).await {
        Ok(updated) => (StatusCode::CREATED, Json(updated)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn cancel_order(
    Extension(state): Extension<AppState>,
    Path(id): Path<u64>,
) -> Response {
    match state.coordinator.cancel_order(OrderId(id)).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_orders(Extension(state): Extension<AppState>) -> Response {
    match state.coordinator.list_orders().await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_funds() -> Response {
    let funds: Vec<&str> = Fund::ALL.iter().map(|f| f.as_str()).collect();
    (StatusCode::OK, Json(funds)).into_response()
}

/// Maps the coordinator's error taxonomy onto HTTP statuses with an
/// `{"error": ...}` body.
fn error_response(e: OrderError) -> Response {
    let status = match &e {
        OrderError::InvalidFund(_)
        | OrderError::InvalidTransactionType(_)
        | OrderError::InvalidQuantity(_)
        | OrderError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
        OrderError::NotFound(_) => StatusCode::NOT_FOUND,
        OrderError::DownstreamUnavailable(_) | OrderError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

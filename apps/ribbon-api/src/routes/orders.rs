//! Guest checkout.
//!
//! ```text
//! POST /api/orders/guest
//!   │
//!   ├── validate_guest_order ───────── invalid ──► 400
//!   │
//!   └── OrderRepository::create_guest_order   (one transaction)
//!         ├── unknown SKU ─────────────────────► 400
//!         ├── quantity > stock ────────────────► 409, nothing written
//!         └── ok ──────────────────────────────► 201 { order }
//! ```
//!
//! Prices come from the catalog; the request carries none.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use ribbon_core::requests::GuestOrderRequest;
use ribbon_core::validation::validate_guest_order;
use ribbon_core::{ApiResponse, Order};
use ribbon_db::DbError;

/// `POST /api/orders/guest`
pub async fn create_guest_order(
    State(state): State<AppState>,
    payload: Result<Json<GuestOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let Json(request) = payload?;
    validate_guest_order(&request)?;

    let order = state
        .db
        .orders()
        .create_guest_order(&request)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => ApiError::BadRequest(e.to_string()),
            DbError::InsufficientStock { .. } => {
                warn!(error = %e, "Guest order rejected");
                ApiError::from(e)
            }
            other => ApiError::from(other),
        })?;

    info!(
        order_number = %order.order_number,
        lines = order.items.len(),
        total = %order.total(),
        "Guest order created"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

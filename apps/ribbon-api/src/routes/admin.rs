//! # Admin Routes
//!
//! Everything except `POST /admin/login` takes [`RequireAdmin`]: no token
//! or a bad one is 401, a valid customer token is 403.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ApiResult};
use crate::routes::account::authenticate;
use crate::AppState;
use ribbon_core::requests::{
    AuthResponse, DeletedResponse, LoginRequest, ProductInput, UpdateOrderStatusRequest,
};
use ribbon_core::validation::validate_product_input;
use ribbon_core::{ApiResponse, CoreError, Order, OrderStatus, Product};

// =============================================================================
// Login
// =============================================================================

/// `POST /admin/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Json(request) = payload?;
    let user = authenticate(&state, &request).await?;

    if !user.is_admin {
        warn!(user_id = %user.id, "Customer attempted admin login");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let token = state.jwt.issue(&user)?;

    info!(user_id = %user.id, "Admin signed in");
    Ok(Json(ApiResponse::ok(AuthResponse { token, user })))
}

// =============================================================================
// Products
// =============================================================================

/// `GET /admin/products`
pub async fn list_products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.db.products().list(None).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// `POST /admin/products`
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state.db.products().insert(&input).await?;

    info!(sku = %product.sku, admin = %admin.email, "Product created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// `PUT /admin/products/{sku}`
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    sku: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let Path(sku) = sku?;
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state.db.products().update(&sku, &input).await?;

    info!(sku = %sku, new_sku = %product.sku, admin = %admin.email, "Product updated");
    Ok(Json(ApiResponse::ok(product)))
}

/// `DELETE /admin/products/{sku}`
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    sku: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let Path(sku) = sku?;
    state.db.products().delete(&sku).await?;

    info!(sku = %sku, admin = %admin.email, "Product deleted");
    Ok(Json(ApiResponse::ok(DeletedResponse { sku })))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /admin/orders[?status=]`, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let Query(query) = query?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<OrderStatus>()?),
    };

    let orders = state.db.orders().list(status).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// `GET /admin/orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let Path(id) = id?;
    let order = find_order(&state, &id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// `PATCH /admin/orders/{id}/status`
///
/// Only forward moves along the order lifecycle are accepted; anything else
/// is 409.
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let Path(id) = id?;
    let Json(request) = payload?;

    let current = find_order(&state, &id).await?;
    let next = current.status.transition_to(request.status)?;

    if next == current.status {
        return Ok(Json(ApiResponse::ok(current)));
    }

    let order = state.db.orders().update_status(&id, next).await?;

    info!(
        order_number = %order.order_number,
        from = %current.status,
        to = %next,
        admin = %admin.email,
        "Order status changed"
    );
    Ok(Json(ApiResponse::ok(order)))
}

async fn find_order(state: &AppState, id: &str) -> ApiResult<Order> {
    state
        .db
        .orders()
        .get(id)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(id.to_string()).into())
}

//! Public catalog reads.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use ribbon_core::requests::ProductQuery;
use ribbon_core::{ApiResponse, CoreError, Product};

/// `GET /api/products[?category=]`
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let Query(query) = query?;
    let products = state.db.products().list(query.category.as_deref()).await?;

    debug!(category = ?query.category, count = products.len(), "Catalog listed");
    Ok(Json(ApiResponse::ok(products)))
}

/// `GET /api/products/{sku}`
pub async fn get_product(
    State(state): State<AppState>,
    sku: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let Path(sku) = sku?;

    let product = state
        .db
        .products()
        .get_by_sku(&sku)
        .await?
        .ok_or_else(|| ApiError::from(CoreError::ProductNotFound(sku)))?;

    Ok(Json(ApiResponse::ok(product)))
}

/// `GET /api/categories`
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let categories = state.db.products().categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

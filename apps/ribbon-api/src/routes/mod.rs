//! Route table.
//!
//! - [`catalog`] - public product reads
//! - [`orders`] - guest checkout
//! - [`account`] - customer login, registration, `me`
//! - [`admin`] - admin login, product CRUD, order management
//! - [`health`] - liveness + database check

pub mod account;
pub mod admin;
pub mod catalog;
pub mod health;
pub mod orders;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Storefront
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{sku}", get(catalog::get_product))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/orders/guest", post(orders::create_guest_order))
        // Customer accounts
        .route("/auth/login", post(account::login))
        .route("/auth/register", post(account::register))
        .route("/auth/me", get(account::me))
        // Admin
        .route("/admin/login", post(admin::login))
        .route(
            "/admin/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/admin/products/{sku}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/admin/orders", get(admin::list_orders))
        .route("/admin/orders/{id}", get(admin::get_order))
        .route("/admin/orders/{id}/status", patch(admin::update_order_status))
}

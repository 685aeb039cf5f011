//! # ribbon-api
//!
//! REST server behind the storefront SPA and the admin dashboard.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Public                                                                 │
//! │    GET    /health                                                       │
//! │    GET    /api/products[?category=]      GET /api/products/{sku}        │
//! │    GET    /api/categories                POST /api/orders/guest         │
//! │    POST   /auth/login                    POST /auth/register            │
//! │                                                                         │
//! │  Signed-in user (RequireUser)                                           │
//! │    GET    /auth/me                                                      │
//! │                                                                         │
//! │  Admin (RequireAdmin; /admin/login is public)                           │
//! │    POST   /admin/login                                                  │
//! │    GET    /admin/products                POST   /admin/products         │
//! │    PUT    /admin/products/{sku}          DELETE /admin/products/{sku}   │
//! │    GET    /admin/orders[?status=]        GET    /admin/orders/{id}      │
//! │    PATCH  /admin/orders/{id}/status                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every JSON body, success or failure, is an
//! [`ApiResponse`](ribbon_core::ApiResponse) envelope.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use crate::auth::JwtManager;
pub use crate::config::ApiConfig;
pub use crate::error::{ApiError, ApiResult};
use ribbon_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}

/// The full application: routes, request tracing and CORS.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin {
        None => layer.allow_origin(Any),
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                warn!(origin = %origin, "Unparseable CORS origin, cross-origin requests disabled");
                layer
            }
        },
    }
}

//! Health check for load balancers and uptime monitors.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::AppState;
use ribbon_core::ApiResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
    pub server_time: String,
}

/// `GET /health`. 503 when the database does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let database = state.db.health_check().await;

    let status = HealthStatus {
        status: if database { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
        server_time: Utc::now().to_rfc3339(),
    };

    if database {
        (StatusCode::OK, Json(ApiResponse::ok(status)))
    } else {
        warn!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, Json(ApiResponse::ok(status)))
    }
}

//! # API Errors
//!
//! Every failure leaves the server as the error envelope with a status:
//!
//! ```text
//! ┌──────────────────┬────────┬─────────────────────────────────────────────┐
//! │ ApiError         │ Status │ Typical source                              │
//! ├──────────────────┼────────┼─────────────────────────────────────────────┤
//! │ BadRequest       │ 400    │ ValidationError, malformed JSON             │
//! │ Unauthorized     │ 401    │ missing / invalid / expired bearer token    │
//! │ Forbidden        │ 403    │ customer token on an admin route            │
//! │ NotFound         │ 404    │ DbError::NotFound                           │
//! │ Conflict         │ 409    │ duplicate SKU or email, insufficient stock  │
//! │ Internal         │ 500    │ anything else (details logged only)         │
//! └──────────────────┴────────┴─────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use ribbon_core::{ApiResponse, CoreError, ValidationError};
use ribbon_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The message is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(details) => {
                error!(error = %details, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(ApiResponse::<()>::err(message))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::InsufficientStock { .. } => {
                ApiError::Conflict(err.to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InsufficientStock { .. } | CoreError::InvalidStatusTransition { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CoreError::Validation(inner) => inner.into(),
            CoreError::EmptyOrder | CoreError::WrongCheckoutStep { .. } => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

// Extractor rejections keep the envelope shape.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_core::OrderStatus;

    #[test]
    fn test_db_error_mapping() {
        let status = |e: DbError| ApiError::from(e).status();

        assert_eq!(status(DbError::not_found("Product", "R1")), StatusCode::NOT_FOUND);
        assert_eq!(status(DbError::duplicate("sku", "R1")), StatusCode::CONFLICT);
        assert_eq!(
            status(DbError::InsufficientStock {
                sku: "R1".into(),
                available: 1,
                requested: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(DbError::PoolExhausted), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::InvalidStatusTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = ApiError::from(CoreError::Validation(ValidationError::required("email")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = ApiError::Internal("disk I/O error at page 7".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }
}

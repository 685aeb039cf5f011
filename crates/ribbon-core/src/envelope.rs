//! # Response Envelope
//!
//! Every JSON response has the same shape:
//!
//! ```text
//!   { "success": true,  "data": { ... } }
//!   { "success": false, "error": "Product not found: R9" }
//! ```
//!
//! [`ApiResponse`] is that wire shape. [`ApiResult`] is the discriminated
//! view callers match on.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapses the envelope into an [`ApiResult`].
    ///
    /// `success: true` with no `data` is treated as a failure; a
    /// `success: false` with no message gets a generic one.
    pub fn into_result(self) -> ApiResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => ApiResult::Success(data),
            (true, None) => ApiResult::Failure("Response contained no data".to_string()),
            (false, _) => ApiResult::Failure(
                self.error
                    .unwrap_or_else(|| "An unexpected error occurred".to_string()),
            ),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for ApiResponse<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::err(e.to_string()),
        }
    }
}

/// Success or failure, with nothing in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResult::Success(data) => Some(data),
            ApiResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResult::Success(_) => None,
            ApiResult::Failure(message) => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Success(data) => ApiResult::Success(f(data)),
            ApiResult::Failure(message) => ApiResult::Failure(message),
        }
    }

    pub fn into_std(self) -> Result<T, String> {
        match self {
            ApiResult::Success(data) => Ok(data),
            ApiResult::Failure(message) => Err(message),
        }
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            ApiResult::Success(data) => ApiResponse::ok(data),
            ApiResult::Failure(message) => ApiResponse::err(message),
        }
    }
}

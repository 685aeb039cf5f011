//! Customer accounts.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use crate::auth::RequireUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use ribbon_core::requests::{AuthResponse, LoginRequest, RegisterRequest};
use ribbon_core::validation::validate_registration;
use ribbon_core::{ApiResponse, User};
use ribbon_db::{DbError, NewUser};

pub(crate) const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Checks credentials. Unknown email and wrong password look the same.
pub(crate) async fn authenticate(state: &AppState, request: &LoginRequest) -> ApiResult<User> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }

    state
        .db
        .users()
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| {
            warn!(email = %request.email, "Failed login");
            ApiError::Unauthorized(BAD_CREDENTIALS.to_string())
        })
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Json(request) = payload?;
    let user = authenticate(&state, &request).await?;
    let token = state.jwt.issue(&user)?;

    info!(user_id = %user.id, "Customer signed in");
    Ok(Json(ApiResponse::ok(AuthResponse { token, user })))
}

/// `POST /auth/register`
///
/// Always creates a customer; admins come from the seed tool.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let Json(request) = payload?;
    validate_registration(&request)?;

    let new_user = NewUser {
        email: request.email,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        is_admin: false,
    };

    let user = state.db.users().insert(&new_user).await.map_err(|e| match e {
        DbError::UniqueViolation { .. } => {
            ApiError::Conflict("An account with this email already exists".to_string())
        }
        other => other.into(),
    })?;
    let token = state.jwt.issue(&user)?;

    info!(user_id = %user.id, "Customer registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse { token, user })),
    ))
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireUser(claims): RequireUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .db
        .users()
        .get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    Ok(Json(ApiResponse::ok(user)))
}

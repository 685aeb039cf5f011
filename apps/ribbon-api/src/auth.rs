//! # Bearer Token Authentication
//!
//! HS256 JWTs signed with the configured secret. One token type, issued by
//! the customer and admin login routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /auth/login | /admin/login                                        │
//! │       │ credentials ok                                                  │
//! │       ▼                                                                 │
//! │  JwtManager::issue(user) ──► { token, user }                            │
//! │                                                                         │
//! │  Authorization: Bearer <token>                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RequireUser  ── bad/missing ──► 401                                    │
//! │  RequireAdmin ── bad/missing ──► 401, valid but !is_admin ──► 403       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use ribbon_core::User;

const ACCESS_TOKEN: &str = "access";

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub email: String,

    pub is_admin: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    pub token_type: String,
}

/// Issues and checks bearer tokens.
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("keys", &"[REDACTED]")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

impl JwtManager {
    pub fn new(secret: &SecretString, lifetime_secs: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        JwtManager {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issues a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = Duration::try_seconds(self.lifetime_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ApiError::Internal(format!("Token lifetime out of range: {}s", self.lifetime_secs))
            })?;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Checks signature, expiry and token type.
    pub fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            })?
            .claims;

        if claims.token_type != ACCESS_TOKEN {
            return Err(ApiError::Unauthorized("Invalid or expired token".to_string()));
        }

        Ok(claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, ApiError> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    state.jwt.validate(token)
}

// =============================================================================
// Extractors
// =============================================================================

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Claims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts, state).map(RequireUser)
    }
}

/// A signed-in admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;

        if !claims.is_admin {
            debug!(user_id = %claims.sub, "Non-admin token on admin route");
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(claims))
    }
}

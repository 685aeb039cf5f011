//! # Client Errors
//!
//! One error type for every request, whichever endpoint it hits.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ Variant          │ Cause                                                │
//! ├──────────────────┼──────────────────────────────────────────────────────┤
//! │ Transport        │ DNS, connect, reset, TLS                             │
//! │ Timeout          │ No response within ClientConfig::timeout             │
//! │ Authentication   │ HTTP 401 (token already purged)                      │
//! │ Validation       │ HTTP 400 / 422                                       │
//! │ Api              │ Any other non-2xx, or success: false                 │
//! │ Decode           │ Body is not the expected envelope                    │
//! │ TokenStorage     │ Token file could not be written                      │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    /// The server rejected the bearer token (or there was none).
    ///
    /// ## When This Occurs
    /// - Token expired or signed with a rotated secret
    /// - A customer token used on an admin route that answers 401
    /// - Bearer route called after logout
    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Token storage failed: {0}")]
    TokenStorage(String),
}

impl ClientError {
    /// Text suitable for showing to a shopper.
    ///
    /// Server-supplied messages are passed through; transport details are
    /// replaced with something readable.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Unable to reach the store. Check your connection and try again.".to_string()
            }
            ClientError::Timeout => "The request timed out. Please try again.".to_string(),
            ClientError::Authentication(_) => "Please sign in to continue.".to_string(),
            ClientError::Validation(message) => message.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Decode(_) => "An unexpected error occurred".to_string(),
            ClientError::TokenStorage(_) => "Could not save your session.".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }

    /// HTTP status behind the error, where there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

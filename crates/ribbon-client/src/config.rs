//! Client configuration.

use std::time::Duration;

/// Fixed per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://localhost:3000`. No trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// Key the bearer token is stored under.
    pub token_key: String,
    /// Passed to the unauthorized hook on a 401.
    pub login_path: String,
}

impl ClientConfig {
    /// Shopper-facing client: token under `token`, 401 sends to `/login`.
    pub fn storefront(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: normalize_base_url(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            token_key: "token".to_string(),
            login_path: "/login".to_string(),
        }
    }

    /// Admin dashboard client: token under `adminToken`, 401 sends to
    /// `/admin/login`.
    pub fn admin(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: normalize_base_url(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            token_key: "adminToken".to_string(),
            login_path: "/admin/login".to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

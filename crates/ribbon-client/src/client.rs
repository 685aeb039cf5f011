//! # API Client
//!
//! Generic verbs over `reqwest`. Every call ends in either the `data` of a
//! successful envelope or a [`ClientError`].

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::{MemoryTokenStore, TokenStore};
use ribbon_core::ApiResponse;

/// Called with [`ClientConfig::login_path`] after a 401.
pub type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Whether a request carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    /// Never attaches a token, even when one is stored.
    Guest,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("token_key", &self.config.token_key)
            .field("tokens", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client with an in-memory token store.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiClient {
            http,
            config,
            tokens: Arc::new(MemoryTokenStore::new()),
            on_unauthorized: None,
        })
    }

    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Sets the login-redirect hook run after a 401.
    pub fn on_unauthorized(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Token
    // =========================================================================

    pub fn has_token(&self) -> bool {
        self.tokens.get(&self.config.token_key).is_some()
    }

    pub fn store_token(&self, token: &str) -> ClientResult<()> {
        self.tokens.set(&self.config.token_key, token)
    }

    pub fn clear_token(&self) -> ClientResult<()> {
        self.tokens.remove(&self.config.token_key)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> ClientResult<T> {
        let url = self.url(path)?;
        self.send(self.http.request(Method::GET, url), auth).await
    }

    /// GET with query parameters. Pairs with a `None` value are left out.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, Option<&str>)],
        auth: Auth,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.map(|v| (*k, v)))
            .collect();
        self.send(self.http.request(Method::GET, url).query(&pairs), auth)
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, auth: Auth) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.send(self.http.request(Method::POST, url).json(body), auth)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B, auth: Auth) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.send(self.http.request(Method::PUT, url).json(body), auth)
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B, auth: Auth) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.send(self.http.request(Method::PATCH, url).json(body), auth)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> ClientResult<T> {
        let url = self.url(path)?;
        self.send(self.http.request(Method::DELETE, url), auth).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// `base_url` + `path`. `path` must start with `/`.
    pub(crate) fn url(&self, path: &str) -> ClientResult<Url> {
        Url::parse(&format!("{}{}", self.config.base_url, path))
            .map_err(|e| ClientError::Transport(format!("invalid URL {path}: {e}")))
    }

    /// `base_url` plus path segments, each percent-encoded.
    pub(crate) fn url_with_segments(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.url("/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Transport("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    #[instrument(skip(self, request), fields(token_key = %self.config.token_key))]
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        auth: Auth,
    ) -> ClientResult<T> {
        let request = match (auth, self.tokens.get(&self.config.token_key)) {
            (Auth::Bearer, Some(token)) => request.bearer_auth(token.expose_secret()),
            _ => request,
        };

        let response = request.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::from_reqwest)?;

        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(&body).unwrap_or_else(|| "Unauthorized".to_string());
            self.handle_unauthorized();
            return Err(ClientError::Authentication(message));
        }

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("An unexpected error occurred")
                    .to_string()
            });
            warn!(status = status.as_u16(), error = %message, "Request failed");

            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(message)
                }
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let envelope: ApiResponse<T> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        envelope.into_result().into_std().map_err(|message| ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn handle_unauthorized(&self) {
        if let Err(e) = self.tokens.remove(&self.config.token_key) {
            warn!(error = %e, "Failed to purge token after 401");
        }
        debug!(redirect = %self.config.login_path, "Token purged after 401");

        if let Some(hook) = &self.on_unauthorized {
            hook(&self.config.login_path);
        }
    }
}

/// The `error` of an envelope body, if the body is one.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiResponse<IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::storefront("http://localhost:3000/")).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client();
        assert_eq!(
            client.url("/api/products").unwrap().as_str(),
            "http://localhost:3000/api/products"
        );
        assert_eq!(
            client
                .url_with_segments(&["api", "products", "RED 25/B"])
                .unwrap()
                .as_str(),
            "http://localhost:3000/api/products/RED%2025%2FB"
        );
    }

    #[test]
    fn test_token_helpers() {
        let client = client();
        assert!(!client.has_token());
        client.store_token("jwt").unwrap();
        assert!(client.has_token());
        client.clear_token().unwrap();
        assert!(!client.has_token());
    }

    #[test]
    fn test_error_message_parsing() {
        assert_eq!(
            error_message(br#"{"success":false,"error":"Email is required"}"#).as_deref(),
            Some("Email is required")
        );
        assert_eq!(error_message(b"<html>502</html>"), None);
    }

    #[test]
    fn test_debug_hides_tokens() {
        let client = client();
        client.store_token("super-secret-jwt").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret-jwt"));
        assert!(debug.contains("localhost:3000"));
    }
}

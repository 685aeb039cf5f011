//! # Typed Endpoints
//!
//! ```text
//! ┌───────────────────────────────┬──────────────────────────────┬─────────┐
//! │ Method                        │ Route                        │ Auth    │
//! ├───────────────────────────────┼──────────────────────────────┼─────────┤
//! │ products(category)            │ GET    /api/products         │ Bearer  │
//! │ product(sku)                  │ GET    /api/products/{sku}   │ Bearer  │
//! │ categories()                  │ GET    /api/categories       │ Bearer  │
//! │ place_guest_order(order)      │ POST   /api/orders/guest     │ Guest   │
//! │ login / register              │ POST   /auth/login|register  │ Guest   │
//! │ me()                          │ GET    /auth/me              │ Bearer  │
//! │ admin_login                   │ POST   /admin/login          │ Guest   │
//! │ admin_products / create / ... │ /admin/products[/{sku}]      │ Bearer  │
//! │ admin_orders / admin_order    │ GET    /admin/orders[/{id}]  │ Bearer  │
//! │ update_order_status           │ PATCH  /admin/orders/{id}/.. │ Bearer  │
//! └───────────────────────────────┴──────────────────────────────┴─────────┘
//! ```
//!
//! Successful logins store the returned token under the configured key.

use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{ApiClient, Auth};
use crate::error::ClientResult;
use ribbon_core::requests::{
    AuthResponse, DeletedResponse, GuestOrderRequest, LoginRequest, ProductInput,
    RegisterRequest, UpdateOrderStatusRequest,
};
use ribbon_core::{Order, OrderStatus, Product, User};

impl ApiClient {
    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn products(&self, category: Option<&str>) -> ClientResult<Vec<Product>> {
        self.get_with_query("/api/products", &[("category", category)], Auth::Bearer)
            .await
    }

    pub async fn product(&self, sku: &str) -> ClientResult<Product> {
        let url = self.url_with_segments(&["api", "products", sku])?;
        self.send(self.request(Method::GET, url), Auth::Bearer).await
    }

    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        self.get("/api/categories", Auth::Bearer).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submits a guest order. Never sends a token.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn place_guest_order(&self, order: &GuestOrderRequest) -> ClientResult<Order> {
        let placed: Order = self.post("/api/orders/guest", order, Auth::Guest).await?;
        info!(order_number = %placed.order_number, "Guest order placed");
        Ok(placed)
    }

    // =========================================================================
    // Customer auth
    // =========================================================================

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.post("/auth/login", &body, Auth::Guest).await?;
        self.store_token(&auth.token)?;
        Ok(auth)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let auth: AuthResponse = self.post("/auth/register", request, Auth::Guest).await?;
        self.store_token(&auth.token)?;
        Ok(auth)
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.get("/auth/me", Auth::Bearer).await
    }

    /// Forgets the stored token. Tokens are stateless, so there is no
    /// server call.
    pub fn logout(&self) -> ClientResult<()> {
        self.clear_token()
    }

    // =========================================================================
    // Admin
    // =========================================================================

    #[instrument(skip(self, password))]
    pub async fn admin_login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.post("/admin/login", &body, Auth::Guest).await?;
        self.store_token(&auth.token)?;
        Ok(auth)
    }

    pub async fn admin_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/admin/products", Auth::Bearer).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> ClientResult<Product> {
        self.post("/admin/products", input, Auth::Bearer).await
    }

    pub async fn update_product(&self, sku: &str, input: &ProductInput) -> ClientResult<Product> {
        let url = self.url_with_segments(&["admin", "products", sku])?;
        self.send(self.request(Method::PUT, url).json(input), Auth::Bearer)
            .await
    }

    pub async fn delete_product(&self, sku: &str) -> ClientResult<DeletedResponse> {
        let url = self.url_with_segments(&["admin", "products", sku])?;
        self.send(self.request(Method::DELETE, url), Auth::Bearer)
            .await
    }

    pub async fn admin_orders(&self, status: Option<OrderStatus>) -> ClientResult<Vec<Order>> {
        self.get_with_query(
            "/admin/orders",
            &[("status", status.map(|s| s.as_str()))],
            Auth::Bearer,
        )
        .await
    }

    pub async fn admin_order(&self, id: &str) -> ClientResult<Order> {
        let url = self.url_with_segments(&["admin", "orders", id])?;
        self.send(self.request(Method::GET, url), Auth::Bearer).await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        let url = self.url_with_segments(&["admin", "orders", id, "status"])?;
        let body = UpdateOrderStatusRequest { status };
        self.send(self.request(Method::PATCH, url).json(&body), Auth::Bearer)
            .await
    }
}

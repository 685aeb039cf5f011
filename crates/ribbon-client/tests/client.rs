//! Client tests against an in-process axum server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use ribbon_client::{ApiClient, Auth, ClientConfig, ClientError, Storefront, StorefrontError};
use ribbon_core::requests::{AuthResponse, GuestOrderRequest};
use ribbon_core::{
    ApiResponse, CartAction, CheckoutStep, CustomerDetails, Order, OrderItem, OrderStatus,
    Product, ShippingAddress, User,
};

const GOOD_TOKEN: &str = "good-token";

// =============================================================================
// Mock server
// =============================================================================

fn product(sku: &str, category: &str) -> Product {
    Product {
        sku: sku.to_string(),
        name: format!("Ribbon {sku}"),
        description: None,
        price_cents: 599,
        image_url: None,
        category: category.to_string(),
        width: Some("2.5\"".to_string()),
        length: Some("10 yd".to_string()),
        is_wired: true,
        quantity: 10,
        color: Some("red".to_string()),
        brand: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn user() -> User {
    User {
        id: "u-1".to_string(),
        email: "ann@example.com".to_string(),
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        is_admin: false,
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

async fn list_products(Query(query): Query<CategoryQuery>) -> Json<ApiResponse<Vec<Product>>> {
    let all = vec![product("R-1", "wired-ribbon"), product("B-1", "bows")];
    let filtered = all
        .into_iter()
        .filter(|p| query.category.as_deref().map_or(true, |c| c == p.category))
        .collect();
    Json(ApiResponse::ok(filtered))
}

async fn echo_auth(headers: HeaderMap) -> Json<ApiResponse<String>> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    Json(ApiResponse::ok(value))
}

async fn login(Json(body): Json<serde_json::Value>) -> Response {
    if body["password"] == "correct horse" {
        Json(ApiResponse::ok(AuthResponse {
            token: GOOD_TOKEN.to_string(),
            user: user(),
        }))
        .into_response()
    } else {
        failure(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn me(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {GOOD_TOKEN}");
    match headers.get(header::AUTHORIZATION) {
        Some(value) if value.as_bytes() == expected.as_bytes() => {
            Json(ApiResponse::ok(user())).into_response()
        }
        _ => failure(StatusCode::UNAUTHORIZED, "Invalid or expired token"),
    }
}

async fn guest_order(headers: HeaderMap, Json(request): Json<GuestOrderRequest>) -> Response {
    if headers.contains_key(header::AUTHORIZATION) {
        return failure(StatusCode::BAD_REQUEST, "guest orders carry no token");
    }

    let items: Vec<OrderItem> = request
        .items
        .iter()
        .enumerate()
        .map(|(i, line)| OrderItem {
            id: format!("item-{i}"),
            order_id: "o-1".to_string(),
            sku: line.sku.clone(),
            name: format!("Ribbon {}", line.sku),
            unit_price_cents: 599,
            quantity: line.quantity,
            line_total_cents: 599 * line.quantity,
        })
        .collect();
    let total = items.iter().map(|i| i.line_total_cents).sum();

    Json(ApiResponse::ok(Order {
        id: "o-1".to_string(),
        order_number: "RB-20260101-00A1B2".to_string(),
        customer: request.customer,
        shipping_address: request.shipping_address,
        status: OrderStatus::Pending,
        subtotal_cents: total,
        total_cents: total,
        notes: request.notes,
        items,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }))
    .into_response()
}

async fn out_of_stock(Json(_): Json<GuestOrderRequest>) -> Response {
    failure(StatusCode::CONFLICT, "Only 2 of R-1 left in stock")
}

async fn slow() -> Json<ApiResponse<u32>> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(ApiResponse::ok(1))
}

fn router(order_conflicts: bool) -> Router {
    let orders = if order_conflicts {
        post(out_of_stock)
    } else {
        post(guest_order)
    };

    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/orders/guest", orders)
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/echo-auth", get(echo_auth))
        .route("/slow", get(slow))
        .route(
            "/bad-request",
            get(|| async { failure(StatusCode::BAD_REQUEST, "Email is required") }),
        )
        .route(
            "/server-error",
            get(|| async { failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error") }),
        )
        .route("/html", get(|| async { "<html>not json</html>" }))
        .route(
            "/plain-502",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .route(
            "/no-data",
            get(|| async { Json(serde_json::json!({ "success": true })) }),
        )
}

async fn spawn_server(order_conflicts: bool) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(order_conflicts)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn storefront_client() -> ApiClient {
    let base = spawn_server(false).await;
    ApiClient::new(ClientConfig::storefront(base)).unwrap()
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        email: "ann@example.com".to_string(),
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        phone: None,
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        line1: "1 Wreath Lane".to_string(),
        line2: None,
        city: "Portland".to_string(),
        state: "OR".to_string(),
        postal_code: "97201".to_string(),
        country: "US".to_string(),
    }
}

// =============================================================================
// ApiClient
// =============================================================================

#[tokio::test]
async fn test_envelope_data_is_unwrapped() {
    let client = storefront_client().await;

    let all = client.products(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let bows = client.products(Some("bows")).await.unwrap();
    assert_eq!(bows.len(), 1);
    assert_eq!(bows[0].sku, "B-1");
}

#[tokio::test]
async fn test_bearer_attached_unless_guest() {
    let client = storefront_client().await;

    let before: String = client.get("/echo-auth", Auth::Bearer).await.unwrap();
    assert_eq!(before, "none");

    client.store_token("abc").unwrap();
    let bearer: String = client.get("/echo-auth", Auth::Bearer).await.unwrap();
    assert_eq!(bearer, "Bearer abc");

    let guest: String = client.get("/echo-auth", Auth::Guest).await.unwrap();
    assert_eq!(guest, "none");
}

#[tokio::test]
async fn test_unauthorized_purges_token_and_calls_hook() {
    let base = spawn_server(false).await;
    let redirects = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = redirects.clone();

    let client = ApiClient::new(ClientConfig::admin(base))
        .unwrap()
        .on_unauthorized(move |path| seen.lock().unwrap().push(path.to_string()));

    client.store_token("stale").unwrap();
    let err = client.me().await.unwrap_err();

    match err {
        ClientError::Authentication(message) => assert_eq!(message, "Invalid or expired token"),
        other => panic!("expected Authentication, got {other:?}"),
    }
    assert!(!client.has_token());
    assert_eq!(*redirects.lock().unwrap(), vec!["/admin/login".to_string()]);
}

#[tokio::test]
async fn test_login_stores_token() {
    let client = storefront_client().await;

    let auth = client.login("ann@example.com", "correct horse").await.unwrap();
    assert_eq!(auth.user.email, "ann@example.com");
    assert!(client.has_token());
    assert_eq!(client.me().await.unwrap(), user());

    client.logout().unwrap();
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_timeout() {
    let base = spawn_server(false).await;
    let client =
        ApiClient::new(ClientConfig::storefront(base).timeout(Duration::from_millis(200))).unwrap();

    let err = client.get::<u32>("/slow", Auth::Guest).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn test_error_taxonomy() {
    let client = storefront_client().await;

    let err = client.get::<u32>("/bad-request", Auth::Guest).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref m) if m == "Email is required"));

    let err = client.get::<u32>("/server-error", Auth::Guest).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));

    let err = client.get::<u32>("/plain-502", Auth::Guest).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api, got {other:?}"),
    }

    let err = client.get::<u32>("/html", Auth::Guest).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));

    let err = client.get::<u32>("/no-data", Auth::Guest).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 200, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(ClientConfig::storefront(format!("http://{addr}"))).unwrap();
    let err = client.products(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
}

// =============================================================================
// Storefront
// =============================================================================

#[tokio::test]
async fn test_storefront_login_and_rejected_session() {
    let mut shop = Storefront::new(storefront_client().await);

    let err = shop.login("ann@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, StorefrontError::Client(ClientError::Authentication(_))));
    assert_eq!(shop.session().error.as_deref(), Some("Invalid email or password"));
    assert!(!shop.session().loading);

    let signed_in = shop.login("ann@example.com", "correct horse").await.unwrap();
    assert_eq!(shop.current_user(), Some(&signed_in));
    assert!(shop.session().error.is_none());

    // Token revoked server-side: the next bearer call clears the session.
    shop.client().store_token("revoked").unwrap();
    assert!(shop.restore_session().await.is_err());
    assert!(shop.current_user().is_none());
    assert!(!shop.client().has_token());
}

#[tokio::test]
async fn test_storefront_restore_without_token_makes_no_call() {
    let mut shop = Storefront::new(storefront_client().await);
    assert_eq!(shop.restore_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_storefront_guest_checkout() {
    let mut shop = Storefront::new(storefront_client().await);
    // A stored token must not leak into the guest order.
    shop.client().store_token(GOOD_TOKEN).unwrap();

    let products = shop.products(None).await.unwrap();
    shop.add_to_cart(&products[0], 2);
    shop.add_to_cart(&products[0], 1);
    shop.add_to_cart(&products[1], 1);
    shop.dispatch(CartAction::UpdateQuantity {
        sku: products[1].sku.clone(),
        quantity: 0,
    });

    shop.submit_shipping(customer(), address(), None).unwrap();
    assert_eq!(shop.checkout().step(), CheckoutStep::Review);

    let order = shop.place_order().await.unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.total_cents, 1797);

    assert!(shop.cart().is_empty());
    assert_eq!(shop.checkout().step(), CheckoutStep::Confirmation);
    assert_eq!(shop.checkout().confirmed_order(), Some(&order));

    shop.start_new_checkout();
    assert_eq!(shop.checkout().step(), CheckoutStep::Shipping);
}

#[tokio::test]
async fn test_storefront_failed_order_keeps_cart() {
    let base = spawn_server(true).await;
    let mut shop = Storefront::new(ApiClient::new(ClientConfig::storefront(base)).unwrap());

    let sample = product("R-1", "wired-ribbon");
    shop.add_to_cart(&sample, 5);
    shop.submit_shipping(customer(), address(), Some("Leave at door".to_string()))
        .unwrap();

    let err = shop.place_order().await.unwrap_err();
    assert_eq!(err.message(), "Only 2 of R-1 left in stock");
    assert_eq!(shop.cart().line_count(), 1);
    assert_eq!(shop.checkout().step(), CheckoutStep::Review);
}

#[tokio::test]
async fn test_storefront_rejects_empty_cart_locally() {
    let mut shop = Storefront::new(storefront_client().await);
    shop.submit_shipping(customer(), address(), None).unwrap();

    let err = shop.place_order().await.unwrap_err();
    assert!(matches!(err, StorefrontError::Core(_)));
}

//! Handler tests through the full router with `oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ribbon_api::{app, ApiConfig, AppState, JwtManager};
use ribbon_core::requests::ProductInput;
use ribbon_core::User;
use ribbon_db::{Database, NewUser};
use secrecy::SecretString;

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::in_memory().await.unwrap();
        let config = ApiConfig::from_builder(ApiConfig::defaults().unwrap()).unwrap();
        let state = AppState::new(db, config);
        TestApp {
            router: app(state.clone()),
            state,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn add_product(&self, sku: &str, category: &str, price_cents: i64, stock: i64) {
        self.state
            .db
            .products()
            .insert(&product_input(sku, category, price_cents, stock))
            .await
            .unwrap();
    }

    async fn add_user(&self, email: &str, is_admin: bool) -> User {
        self.state
            .db
            .users()
            .insert(&NewUser {
                email: email.to_string(),
                password: "correct horse".to_string(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                is_admin,
            })
            .await
            .unwrap()
    }

    async fn admin_token(&self) -> String {
        let admin = self.add_user("admin@ribbon.shop", true).await;
        self.state.jwt.issue(&admin).unwrap()
    }

    async fn stock(&self, sku: &str) -> i64 {
        self.state
            .db
            .products()
            .get_by_sku(sku)
            .await
            .unwrap()
            .unwrap()
            .quantity
    }
}

fn product_input(sku: &str, category: &str, price_cents: i64, stock: i64) -> ProductInput {
    ProductInput {
        sku: sku.to_string(),
        name: format!("Ribbon {sku}"),
        description: None,
        price_cents,
        image_url: None,
        category: category.to_string(),
        width: Some("2.5\"".to_string()),
        length: Some("10 yd".to_string()),
        is_wired: true,
        quantity: stock,
        color: None,
        brand: None,
    }
}

fn guest_order(items: Value) -> Value {
    json!({
        "customer": {
            "email": "ann@example.com",
            "firstName": "Ann",
            "lastName": "Lee"
        },
        "shippingAddress": {
            "line1": "1 Wreath Lane",
            "city": "Portland",
            "state": "OR",
            "postalCode": "97201",
            "country": "US"
        },
        "items": items
    })
}

// =============================================================================
// Public routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_catalog_reads() {
    let app = TestApp::new().await;
    app.add_product("R-1", "wired-ribbon", 599, 5).await;
    app.add_product("B-1", "bows", 1299, 2).await;

    let (status, body) = app.call("GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .call("GET", "/api/products?category=bows", None, None)
        .await;
    assert_eq!(body["data"][0]["sku"], "B-1");
    assert_eq!(body["data"][0]["priceCents"], 1299);

    let (status, body) = app.call("GET", "/api/products/R-1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isWired"], true);

    let (status, body) = app.call("GET", "/api/products/NOPE", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Product not found: NOPE");

    let (_, body) = app.call("GET", "/api/categories", None, None).await;
    assert_eq!(body["data"], json!(["bows", "wired-ribbon"]));
}

#[tokio::test]
async fn test_guest_order_prices_from_catalog_and_decrements_stock() {
    let app = TestApp::new().await;
    app.add_product("R-1", "wired-ribbon", 599, 5).await;
    app.add_product("B-1", "bows", 1299, 2).await;

    let order = guest_order(json!([
        { "sku": "R-1", "quantity": 3, "unitPriceCents": 1 },
        { "sku": "B-1", "quantity": 1 }
    ]));
    let (status, body) = app
        .call("POST", "/api/orders/guest", None, Some(order))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["totalCents"], 3 * 599 + 1299);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert!(body["data"]["orderNumber"].as_str().unwrap().starts_with("RB-"));

    assert_eq!(app.stock("R-1").await, 2);
    assert_eq!(app.stock("B-1").await, 1);
}

#[tokio::test]
async fn test_guest_order_insufficient_stock_rolls_back() {
    let app = TestApp::new().await;
    app.add_product("R-1", "wired-ribbon", 599, 5).await;
    app.add_product("B-1", "bows", 1299, 2).await;

    let order = guest_order(json!([
        { "sku": "R-1", "quantity": 1 },
        { "sku": "B-1", "quantity": 3 }
    ]));
    let (status, body) = app
        .call("POST", "/api/orders/guest", None, Some(order))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("B-1"));

    assert_eq!(app.stock("R-1").await, 5);
    assert_eq!(app.stock("B-1").await, 2);
}

#[tokio::test]
async fn test_guest_order_rejections() {
    let app = TestApp::new().await;
    app.add_product("R-1", "wired-ribbon", 599, 5).await;

    let (status, body) = app
        .call("POST", "/api/orders/guest", None, Some(guest_order(json!([]))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "items is required");

    let unknown = guest_order(json!([{ "sku": "GHOST", "quantity": 1 }]));
    let (status, _) = app
        .call("POST", "/api/orders/guest", None, Some(unknown))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call("POST", "/api/orders/guest", None, Some(json!({ "items": 3 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Customer accounts
// =============================================================================

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new().await;

    let registration = json!({
        "email": "Ann@Example.com",
        "password": "correct horse",
        "firstName": "Ann",
        "lastName": "Lee"
    });
    let (status, body) = app
        .call("POST", "/auth/register", None, Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user"]["email"], "ann@example.com");
    assert_eq!(body["data"]["user"]["isAdmin"], false);

    let (status, _) = app
        .call("POST", "/auth/register", None, Some(registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = app
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.call("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], "Ann");

    let (status, _) = app.call("GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "email": "ann@example.com",
                "password": "short",
                "firstName": "Ann",
                "lastName": "Lee"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("password"));
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_token() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/admin/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .call("GET", "/admin/orders", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = app.add_user("ann@example.com", false).await;
    let customer_token = app.state.jwt.issue(&customer).unwrap();
    let (status, _) = app
        .call("GET", "/admin/products", Some(&customer_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let forged = JwtManager::new(
        &SecretString::from("some-other-secret-value".to_string()),
        3600,
    )
    .issue(&User {
        is_admin: true,
        ..customer
    })
    .unwrap();
    let (status, _) = app
        .call("GET", "/admin/products", Some(&forged), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login() {
    let app = TestApp::new().await;
    app.add_user("admin@ribbon.shop", true).await;
    app.add_user("ann@example.com", false).await;

    let credentials = |email: &str| json!({ "email": email, "password": "correct horse" });

    let (status, body) = app
        .call("POST", "/admin/login", None, Some(credentials("admin@ribbon.shop")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["isAdmin"], true);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .call("GET", "/admin/products", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call("POST", "/admin/login", None, Some(credentials("ann@example.com")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_product_crud() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let input = serde_json::to_value(product_input("GOLD-25", "wired-ribbon", 599, 10)).unwrap();
    let (status, body) = app
        .call("POST", "/admin/products", Some(&token), Some(input.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["sku"], "GOLD-25");

    let (status, _) = app
        .call("POST", "/admin/products", Some(&token), Some(input.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut invalid = input.clone();
    invalid["priceCents"] = json!(-1);
    let (status, _) = app
        .call("POST", "/admin/products", Some(&token), Some(invalid))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut changed = input.clone();
    changed["priceCents"] = json!(799);
    changed["quantity"] = json!(40);
    let (status, body) = app
        .call("PUT", "/admin/products/GOLD-25", Some(&token), Some(changed.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["priceCents"], 799);
    assert_eq!(body["data"]["quantity"], 40);

    let (status, _) = app
        .call("PUT", "/admin/products/MISSING", Some(&token), Some(changed))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call("DELETE", "/admin/products/GOLD-25", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "sku": "GOLD-25" }));

    let (status, _) = app
        .call("DELETE", "/admin/products/GOLD-25", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_order_management() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    app.add_product("R-1", "wired-ribbon", 599, 5).await;

    let (_, body) = app
        .call(
            "POST",
            "/api/orders/guest",
            None,
            Some(guest_order(json!([{ "sku": "R-1", "quantity": 1 }]))),
        )
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.call("GET", "/admin/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .call("GET", "/admin/orders?status=shipped", Some(&token), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call("GET", "/admin/orders?status=lost", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call("GET", &format!("/admin/orders/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["sku"], "R-1");

    let status_uri = format!("/admin/orders/{id}/status");
    let (status, body) = app
        .call("PATCH", &status_uri, Some(&token), Some(json!({ "status": "processing" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "processing");

    let (status, body) = app
        .call("PATCH", &status_uri, Some(&token), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Order cannot move from processing to pending");

    let (status, _) = app
        .call("GET", "/admin/orders/no-such-order", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

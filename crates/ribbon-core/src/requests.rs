//! # Request / Response Bodies
//!
//! JSON bodies shared by ribbon-client and ribbon-api. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CustomerDetails, OrderStatus, ShippingAddress, User};

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Returned by every login/register route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Orders
// =============================================================================

/// One requested line. Prices are never sent; the server prices from the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineRequest {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuestOrderRequest {
    pub customer: CustomerDetails,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderLineRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Products
// =============================================================================

/// Admin create/replace body for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub is_wired: bool,
    pub quantity: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// `GET /api/products?category=`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// Data of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeletedResponse {
    pub sku: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_order_wire_shape() {
        let json = serde_json::json!({
            "customer": {"email": "a@b.co", "firstName": "A", "lastName": "B"},
            "shippingAddress": {
                "line1": "1 Main St", "city": "Austin", "state": "TX",
                "postalCode": "78701", "country": "US"
            },
            "items": [{"sku": "R1", "quantity": 2}]
        });

        let req: GuestOrderRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.items[0].quantity, 2);
        assert!(req.notes.is_none());
        assert!(req.customer.phone.is_none());
        assert!(req.shipping_address.line2.is_none());
    }

    #[test]
    fn test_product_input_defaults() {
        let json = serde_json::json!({
            "sku": "BOW-RED", "name": "Red Bow", "priceCents": 899,
            "category": "bows", "quantity": 10
        });
        let input: ProductInput = serde_json::from_value(json).unwrap();
        assert!(!input.is_wired);
        assert!(input.brand.is_none());
    }
}

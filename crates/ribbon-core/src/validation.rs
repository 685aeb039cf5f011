//! # Validation Module
//!
//! Input validation rules shared by the server and the client.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: ribbon-client / Checkout                                     │
//! │  └── Reject obviously bad orders before a request is sent              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ribbon-api handler                                           │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (sku, email)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ribbon_core::validation::{validate_quantity, validate_sku};
//!
//! validate_sku("WIRED-GOLD-25").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::requests::{GuestOrderRequest, ProductInput, RegisterRequest};
use crate::types::{CustomerDetails, ShippingAddress};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MIN_PASSWORD_LENGTH};

pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Not empty, at most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use ribbon_core::validation::validate_sku;
///
/// assert!(validate_sku("BURLAP-15").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "sku",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Categories are lowercase slugs such as `wired-ribbon`.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, 50)?;

    if !category
        .trim()
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::invalid_format(
            "category",
            "must be a lowercase slug",
        ));
    }

    Ok(())
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::invalid_format(
            "email",
            "must be a valid email address",
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, 100)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an ordered quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Zero is allowed (free samples); negative is not.
///
/// ```rust
/// use ribbon_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(599).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-1).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Stock on hand can be zero (sold out) but never negative.
pub fn validate_stock(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// ```rust
/// use ribbon_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format("id", "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

pub fn validate_customer(customer: &CustomerDetails) -> ValidationResult<()> {
    validate_email(&customer.email)?;
    validate_person_name("firstName", &customer.first_name)?;
    validate_person_name("lastName", &customer.last_name)?;

    if let Some(phone) = customer.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || " +-().".contains(c))
        {
            return Err(ValidationError::invalid_format(
                "phone",
                "may contain only digits, spaces and + - ( )",
            ));
        }
    }

    Ok(())
}

pub fn validate_shipping_address(address: &ShippingAddress) -> ValidationResult<()> {
    validate_text("line1", &address.line1, 200)?;
    validate_text("city", &address.city, 100)?;
    validate_text("state", &address.state, 100)?;
    validate_text("postalCode", &address.postal_code, 20)?;
    validate_text("country", &address.country, 60)?;
    Ok(())
}

/// Validates a guest order before it reaches the database.
///
/// ## Rules
/// - Customer and address fields present and well formed
/// - 1..=[`MAX_ORDER_LINES`] lines
/// - Every SKU valid and listed once
/// - Every quantity in 1..=[`MAX_ITEM_QUANTITY`]
pub fn validate_guest_order(order: &GuestOrderRequest) -> ValidationResult<()> {
    validate_customer(&order.customer)?;
    validate_shipping_address(&order.shipping_address)?;

    if order.items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if order.items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    let mut seen = HashSet::with_capacity(order.items.len());
    for line in &order.items {
        validate_sku(&line.sku)?;
        validate_quantity(line.quantity)?;

        if !seen.insert(line.sku.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: line.sku.clone(),
            });
        }
    }

    if let Some(notes) = &order.notes {
        if notes.chars().count() > 1000 {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: 1000,
            });
        }
    }

    Ok(())
}

pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_sku(&input.sku)?;
    validate_product_name(&input.name)?;
    validate_category(&input.category)?;
    validate_price_cents(input.price_cents)?;
    validate_stock(input.quantity)?;
    Ok(())
}

pub fn validate_registration(req: &RegisterRequest) -> ValidationResult<()> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_person_name("firstName", &req.first_name)?;
    validate_person_name("lastName", &req.last_name)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

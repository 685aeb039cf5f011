//! # Order Repository
//!
//! Guest order placement and admin order management.
//!
//! ## Guest Order Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    for each line:                                                       │
//! │      SELECT name, price_cents, quantity FROM products WHERE sku = ?     │
//! │        └── none? ──────────────────────────────► NotFound   (rollback)  │
//! │      UPDATE products SET quantity = quantity - n                        │
//! │        WHERE sku = ? AND quantity >= n                                  │
//! │        └── 0 rows? ────────────────────────────► InsufficientStock      │
//! │                                                              (rollback) │
//! │    INSERT orders, INSERT order_items (price snapshots)                  │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional `UPDATE` is the stock check: two orders racing for the
//! last unit cannot both match `quantity >= n`. Prices always come from the
//! catalog row read inside the transaction.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ribbon_core::requests::GuestOrderRequest;
use ribbon_core::{CustomerDetails, Money, Order, OrderItem, OrderStatus, ShippingAddress};

const ORDER_COLUMNS: &str = "id, order_number, customer_email, customer_first_name, \
     customer_last_name, customer_phone, ship_line1, ship_line2, ship_city, ship_state, \
     ship_postal_code, ship_country, status, subtotal_cents, total_cents, notes, \
     created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, sku, name, unit_price_cents, quantity, line_total_cents";

/// Flat `orders` row; [`Order`] nests customer and address.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    customer_email: String,
    customer_first_name: String,
    customer_last_name: String,
    customer_phone: Option<String>,
    ship_line1: String,
    ship_line2: Option<String>,
    ship_city: String,
    ship_state: String,
    ship_postal_code: String,
    ship_country: String,
    status: OrderStatus,
    subtotal_cents: i64,
    total_cents: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            customer: CustomerDetails {
                email: self.customer_email,
                first_name: self.customer_first_name,
                last_name: self.customer_last_name,
                phone: self.customer_phone,
            },
            shipping_address: ShippingAddress {
                line1: self.ship_line1,
                line2: self.ship_line2,
                city: self.ship_city,
                state: self.ship_state,
                postal_code: self.ship_postal_code,
                country: self.ship_country,
            },
            status: self.status,
            subtotal_cents: self.subtotal_cents,
            total_cents: self.total_cents,
            notes: self.notes,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places a guest order and decrements stock, all or nothing.
    ///
    /// The request is expected to be validated already
    /// (`ribbon_core::validation::validate_guest_order`).
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] for an unknown SKU
    /// - [`DbError::InsufficientStock`] when a line can't be filled
    pub async fn create_guest_order(&self, request: &GuestOrderRequest) -> DbResult<Order> {
        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let order_number = generate_order_number(now);

        debug!(order_number = %order_number, lines = request.items.len(), "Creating guest order");

        // Take the write lock up front. A deferred transaction that reads
        // before writing gets SQLITE_BUSY on upgrade instead of waiting out
        // the busy timeout. Dropping `tx` on any early return rolls back.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let mut items = Vec::with_capacity(request.items.len());

        for line in &request.items {
            let product: Option<(String, i64, i64)> = sqlx::query_as(
                "SELECT name, price_cents, quantity FROM products WHERE sku = ?1",
            )
            .bind(&line.sku)
            .fetch_optional(&mut *tx)
            .await?;

            let (name, price_cents, available) =
                product.ok_or_else(|| DbError::not_found("Product", &line.sku))?;

            let updated = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?1, updated_at = ?2
                WHERE sku = ?3 AND quantity >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(now)
            .bind(&line.sku)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                warn!(
                    sku = %line.sku,
                    available,
                    requested = line.quantity,
                    "Insufficient stock, rolling back order"
                );
                return Err(DbError::InsufficientStock {
                    sku: line.sku.clone(),
                    available,
                    requested: line.quantity,
                });
            }

            let line_total = Money::from_cents(price_cents).multiply_quantity(line.quantity);

            items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                sku: line.sku.clone(),
                name,
                unit_price_cents: price_cents,
                quantity: line.quantity,
                line_total_cents: line_total.cents(),
            });
        }

        let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
        // No tax or shipping lines yet: total == subtotal.
        let total = subtotal;

        let customer = &request.customer;
        let address = &request.shipping_address;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number,
                customer_email, customer_first_name, customer_last_name, customer_phone,
                ship_line1, ship_line2, ship_city, ship_state, ship_postal_code, ship_country,
                status, subtotal_cents, total_cents, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?17
            )
            "#,
        )
        .bind(&order_id)
        .bind(&order_number)
        .bind(customer.email.trim())
        .bind(customer.first_name.trim())
        .bind(customer.last_name.trim())
        .bind(&customer.phone)
        .bind(address.line1.trim())
        .bind(&address.line2)
        .bind(address.city.trim())
        .bind(address.state.trim())
        .bind(address.postal_code.trim())
        .bind(address.country.trim())
        .bind(OrderStatus::Pending)
        .bind(subtotal.cents())
        .bind(total.cents())
        .bind(&request.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, sku, name, unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            order_number = %order_number,
            total_cents = total.cents(),
            "Guest order placed"
        );

        self.get(&order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", &order_id))
    }

    /// An order with its items, or `Ok(None)`.
    pub async fn get(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items(&row.id).await?;
                Ok(Some(row.into_order(items)))
            }
            None => Ok(None),
        }
    }

    /// Orders newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<OrderStatus>) -> DbResult<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE status = ?1 ORDER BY created_at DESC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items(&row.id).await?;
            orders.push(row.into_order(items));
        }

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY rowid"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Sets the status. Transition rules are checked by the caller
    /// ([`OrderStatus::transition_to`]).
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<Order> {
        let result = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        info!(order_id = %id, status = %status, "Order status updated");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }
}

/// `RB-YYYYMMDD-XXXXXX`, the suffix being six uppercase hex digits.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect();

    format!("RB-{}-{}", now.format("%Y%m%d"), suffix.to_ascii_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================

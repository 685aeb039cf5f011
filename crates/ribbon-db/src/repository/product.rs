//! # Product Repository
//!
//! Catalog reads for the storefront and CRUD for the admin.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /api/products?category=bows  ──► list(Some("bows"))               │
//! │  GET  /api/products/{sku}          ──► get_by_sku(sku)                  │
//! │  POST /admin/products              ──► insert(input)                    │
//! │  PUT  /admin/products/{sku}        ──► update(sku, input)               │
//! │  DELETE /admin/products/{sku}      ──► delete(sku)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock decrements happen in
//! [`OrderRepository`](crate::OrderRepository), never here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use ribbon_core::requests::ProductInput;
use ribbon_core::Product;

pub(crate) const PRODUCT_COLUMNS: &str = "sku, name, description, price_cents, image_url, \
     category, width, length, is_wired, quantity, color, brand, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by name, optionally within one category.
    pub async fn list(&self, category: Option<&str>) -> DbResult<Vec<Product>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        debug!(category = ?category, "Listing products");

        let products = match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY name"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Returns `Ok(None)` when the SKU is unknown.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Creates a product. A taken SKU is a [`DbError::UniqueViolation`].
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let sku = input.sku.trim();

        debug!(sku = %sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, description, price_cents, image_url,
                category, width, length, is_wired, quantity,
                color, brand, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            "#,
        )
        .bind(sku)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.image_url)
        .bind(input.category.trim())
        .bind(&input.width)
        .bind(&input.length)
        .bind(input.is_wired)
        .bind(input.quantity)
        .bind(&input.color)
        .bind(&input.brand)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(sku))?;

        info!(sku = %sku, "Product created");

        self.get_by_sku(sku)
            .await?
            .ok_or_else(|| DbError::not_found("Product", sku))
    }

    /// Replaces every field of the product at `sku`.
    ///
    /// The SKU in `input` may differ from `sku` (rename). Renaming onto an
    /// existing SKU is a [`DbError::UniqueViolation`].
    pub async fn update(&self, sku: &str, input: &ProductInput) -> DbResult<Product> {
        let new_sku = input.sku.trim();

        debug!(sku = %sku, new_sku = %new_sku, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?1, name = ?2, description = ?3, price_cents = ?4,
                image_url = ?5, category = ?6, width = ?7, length = ?8,
                is_wired = ?9, quantity = ?10, color = ?11, brand = ?12,
                updated_at = ?13
            WHERE sku = ?14
            "#,
        )
        .bind(new_sku)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.image_url)
        .bind(input.category.trim())
        .bind(&input.width)
        .bind(&input.length)
        .bind(input.is_wired)
        .bind(input.quantity)
        .bind(&input.color)
        .bind(&input.brand)
        .bind(Utc::now())
        .bind(sku)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(new_sku))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", sku));
        }

        info!(sku = %new_sku, "Product updated");

        self.get_by_sku(new_sku)
            .await?
            .ok_or_else(|| DbError::not_found("Product", new_sku))
    }

    /// Deletes a product. Existing orders keep their snapshot of it.
    pub async fn delete(&self, sku: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE sku = ?1")
            .bind(sku)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", sku));
        }

        info!(sku = %sku, "Product deleted");
        Ok(())
    }

    /// Distinct categories, alphabetical.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }
}

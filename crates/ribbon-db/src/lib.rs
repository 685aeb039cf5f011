//! # ribbon-db: Database Layer for the Ribbon Storefront
//!
//! SQLite persistence for the catalog, orders and accounts, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Ribbon Storefront Data Flow                         │
//! │                                                                         │
//! │  axum handler (POST /api/orders/guest)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ribbon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo    │    │              │  │   │
//! │  │   │  SqlitePool   │◄───│ OrderRepo      │    │ 001_initial  │  │   │
//! │  │   │               │    │ UserRepo       │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SQLite (ribbon.db, or in-memory in tests)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`password`] - argon2 password hashing
//! - [`error`] - Database error types
//! - [`repository`] - Products, orders, users
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ribbon_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./ribbon.db")).await?;
//! let bows = db.products().list(Some("bows")).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::user::{NewUser, UserRepository};

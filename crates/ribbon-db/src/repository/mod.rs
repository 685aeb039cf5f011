//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.products().get_by_sku("GOLD-25")                     │
//! │       ▼                                                                 │
//! │  ProductRepository / OrderRepository / UserRepository                  │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! │                                                                         │
//! │  Handlers never write SQL; repositories never see HTTP.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`ProductRepository`](product::ProductRepository) - catalog CRUD
//! - [`OrderRepository`](order::OrderRepository) - guest orders, status
//! - [`UserRepository`](user::UserRepository) - accounts and credentials

pub mod order;
pub mod product;
pub mod user;

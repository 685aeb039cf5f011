//! # ribbon-client: Storefront HTTP Client
//!
//! One client for both the storefront and the admin dashboard. The two
//! differ only in configuration ([`ClientConfig::storefront`] and
//! [`ClientConfig::admin`]).
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ApiClient::send                                 │
//! │                                                                         │
//! │   Auth::Bearer ──► TokenStore.get(token_key) ──► Authorization header   │
//! │   Auth::Guest  ──► no header                                            │
//! │                                                                         │
//! │   response                                                              │
//! │     ├── 401         ──► purge token, call login hook, Authentication    │
//! │     ├── 400 / 422   ──► Validation(envelope.error)                      │
//! │     ├── other 4xx/5xx ► Api { status, message }                         │
//! │     └── 2xx         ──► ApiResponse<T> ──► T  (or Api / Decode)         │
//! │                                                                         │
//! │   timeout ──► Timeout        connect / IO ──► Transport                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No call is retried.
//!
//! ## Modules
//! - [`client`] - [`ApiClient`] and the generic verbs
//! - [`api`] - typed endpoint helpers
//! - [`token`] - bearer token storage
//! - [`storefront`] - cart, session and checkout wired to the client

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod storefront;
pub mod token;

pub use client::{ApiClient, Auth};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use storefront::{Storefront, StorefrontError};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

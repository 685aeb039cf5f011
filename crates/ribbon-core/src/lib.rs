//! # ribbon-core: Pure Business Logic for the Ribbon Storefront
//!
//! Domain types and state containers for the storefront, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Ribbon Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │    Catalog ──► Product ──► Cart Drawer ──► Checkout Wizard      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (JSON envelope)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           ribbon-client  /  apps/ribbon-api                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ribbon-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  session  │  │ checkout  │  │ envelope  │  │   │
//! │  │   │  reducer  │  │  reducer  │  │   steps   │  │ ApiResult │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │validation │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart line items and the cart reducer
//! - [`session`] - Signed-in user session reducer
//! - [`checkout`] - The three-step checkout wizard
//! - [`envelope`] - `{success, data, error}` response envelope
//! - [`types`] - Products, orders, users
//! - [`requests`] - Request/response bodies shared by client and server
//! - [`money`] - Integer money (cents)
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ribbon_core::cart::{reduce, CartAction, CartLineItem, CartState};
//!
//! let item = CartLineItem::new("R1", "Burlap Ribbon", 500, 2);
//! let state = reduce(CartState::default(), CartAction::AddItem(item.clone()));
//! let state = reduce(state, CartAction::AddItem(CartLineItem { quantity: 3, ..item }));
//!
//! assert_eq!(state.items.len(), 1);
//! assert_eq!(state.item_count(), 5);
//! assert_eq!(state.total().to_string(), "$25.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod envelope;
pub mod error;
pub mod money;
pub mod requests;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartLineItem, CartState};
pub use checkout::{Checkout, CheckoutStep};
pub use envelope::{ApiResponse, ApiResult};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{SessionAction, SessionState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single SKU in one order.
///
/// The cart itself is unbounded; this limit is applied when an order is
/// validated.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of distinct lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Minimum password length for customer and admin accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

//! # Storefront
//!
//! The cart, session and checkout stores wired to an [`ApiClient`].
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart ... ─► submit_shipping ─► place_order ─► Confirmation     │
//! │                           ▲     │           │                           │
//! │                           └─back┘           ├── ok:  confirm(order),    │
//! │                                             │        ClearCart          │
//! │                                             └── err: cart untouched     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating call takes `&mut self`, so two order submissions through
//! one `Storefront` cannot overlap.
//!
//! Any 401 from the server dispatches [`SessionAction::Logout`].

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::ClientError;
use ribbon_core::requests::RegisterRequest;
use ribbon_core::{
    CartAction, CartLineItem, CartState, Checkout, CoreError, CustomerDetails, Order, Product,
    SessionAction, SessionState, ShippingAddress, User, ValidationError,
};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ValidationError> for StorefrontError {
    fn from(err: ValidationError) -> Self {
        StorefrontError::Core(CoreError::Validation(err))
    }
}

impl StorefrontError {
    /// Text suitable for showing to a shopper.
    pub fn message(&self) -> String {
        match self {
            StorefrontError::Core(e) => e.to_string(),
            StorefrontError::Client(e) => e.message(),
        }
    }
}

pub type StorefrontResult<T> = Result<T, StorefrontError>;

#[derive(Debug)]
pub struct Storefront {
    client: ApiClient,
    cart: CartState,
    session: SessionState,
    checkout: Checkout,
}

impl Storefront {
    pub fn new(client: ApiClient) -> Self {
        Storefront {
            client,
            cart: CartState::default(),
            session: SessionState::default(),
            checkout: Checkout::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user.as_ref()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn dispatch(&mut self, action: CartAction) {
        self.cart.dispatch(action);
    }

    pub fn add_to_cart(&mut self, product: &Product, quantity: i64) {
        debug!(sku = %product.sku, quantity, "Add to cart");
        self.cart
            .dispatch(CartAction::AddItem(CartLineItem::from_product(product, quantity)));
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn products(&mut self, category: Option<&str>) -> StorefrontResult<Vec<Product>> {
        let result = self.client.products(category).await;
        self.observe(result)
    }

    pub async fn product(&mut self, sku: &str) -> StorefrontResult<Product> {
        let result = self.client.product(sku).await;
        self.observe(result)
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&mut self, email: &str, password: &str) -> StorefrontResult<User> {
        self.session.dispatch(SessionAction::SetLoading(true));
        let result = self.client.login(email, password).await;
        self.finish_auth(result.map(|auth| auth.user))
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> StorefrontResult<User> {
        if let Err(e) = ribbon_core::validation::validate_registration(request) {
            self.session.dispatch(SessionAction::SetError(Some(e.to_string())));
            return Err(e.into());
        }

        self.session.dispatch(SessionAction::SetLoading(true));
        let result = self.client.register(request).await;
        self.finish_auth(result.map(|auth| auth.user))
    }

    /// Loads the user behind a stored token, if any.
    ///
    /// Returns `Ok(None)` without a request when no token is stored.
    pub async fn restore_session(&mut self) -> StorefrontResult<Option<User>> {
        if !self.client.has_token() {
            return Ok(None);
        }

        self.session.dispatch(SessionAction::SetLoading(true));
        let result = self.client.me().await;
        self.finish_auth(result).map(Some)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.client.logout() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.session.dispatch(SessionAction::Logout);
        info!("Logged out");
    }

    fn finish_auth(&mut self, result: Result<User, ClientError>) -> StorefrontResult<User> {
        self.session.dispatch(SessionAction::SetLoading(false));
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "Signed in");
                self.session.dispatch(SessionAction::SetUser(Some(user.clone())));
                Ok(user)
            }
            Err(e) => {
                let message = match &e {
                    ClientError::Authentication(message) => message.clone(),
                    other => other.message(),
                };
                let err = self.observe::<User>(Err(e));
                self.session.dispatch(SessionAction::SetError(Some(message)));
                err
            }
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    pub fn submit_shipping(
        &mut self,
        customer: CustomerDetails,
        shipping_address: ShippingAddress,
        notes: Option<String>,
    ) -> StorefrontResult<()> {
        self.checkout
            .submit_shipping(customer, shipping_address, notes)?;
        Ok(())
    }

    pub fn back_to_shipping(&mut self) -> StorefrontResult<()> {
        self.checkout.back()?;
        Ok(())
    }

    /// Places the guest order for the current cart.
    ///
    /// On success the checkout moves to confirmation and the cart is
    /// cleared. On failure both are left as they were so the shopper can
    /// retry.
    pub async fn place_order(&mut self) -> StorefrontResult<Order> {
        let request = self.checkout.build_order_request(&self.cart)?;

        let result = self.client.place_guest_order(&request).await;
        let order = self.observe(result)?;

        self.checkout.confirm(order.clone())?;
        self.cart.dispatch(CartAction::ClearCart);

        info!(order_number = %order.order_number, total = %order.total(), "Order confirmed");
        Ok(order)
    }

    /// Leaves the confirmation page for a fresh checkout.
    pub fn start_new_checkout(&mut self) {
        self.checkout.reset();
    }

    /// Passes a client result through, logging the session out on a 401.
    fn observe<T>(&mut self, result: Result<T, ClientError>) -> StorefrontResult<T> {
        if matches!(&result, Err(e) if e.is_unauthorized()) {
            if self.session.is_authenticated() {
                warn!("Session rejected by server, logging out");
            }
            self.session.dispatch(SessionAction::Logout);
        }
        result.map_err(StorefrontError::from)
    }
}

//! # Checkout Wizard
//!
//! The three-step checkout as a small linear state machine.
//!
//! ```text
//!  ┌────────────┐ submit_shipping ┌────────────┐    confirm    ┌──────────────┐
//!  │ Shipping 0 │ ──────────────► │  Review 1  │ ────────────► │ Confirmation │
//!  └────────────┘ ◄────────────── └────────────┘               │      2       │
//!                      back                                    └──────┬───────┘
//!        ▲                                                            │
//!        └─────────────────────────── reset ──────────────────────────┘
//! ```
//!
//! No branching and no cancellation. The cart itself is not owned here;
//! [`Checkout::build_order_request`] reads it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartState;
use crate::error::{CoreError, CoreResult};
use crate::requests::{GuestOrderRequest, OrderLineRequest};
use crate::types::{CustomerDetails, Order, ShippingAddress};
use crate::validation::validate_guest_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Review,
    Confirmation,
}

impl CheckoutStep {
    /// Zero-based step index shown by the wizard's stepper.
    pub const fn index(&self) -> usize {
        match self {
            CheckoutStep::Shipping => 0,
            CheckoutStep::Review => 1,
            CheckoutStep::Confirmation => 2,
        }
    }

    pub const fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Shipping => Some(CheckoutStep::Review),
            CheckoutStep::Review => Some(CheckoutStep::Confirmation),
            CheckoutStep::Confirmation => None,
        }
    }

    pub const fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Shipping => None,
            CheckoutStep::Review => Some(CheckoutStep::Shipping),
            CheckoutStep::Confirmation => Some(CheckoutStep::Review),
        }
    }
}

/// Wizard state: the current step plus what each step collected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkout {
    step: CheckoutStep,
    customer: Option<CustomerDetails>,
    shipping_address: Option<ShippingAddress>,
    notes: Option<String>,
    confirmed: Option<Order>,
}

impl Checkout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn customer(&self) -> Option<&CustomerDetails> {
        self.customer.as_ref()
    }

    pub fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address.as_ref()
    }

    /// The placed order, once the wizard reached confirmation.
    pub fn confirmed_order(&self) -> Option<&Order> {
        self.confirmed.as_ref()
    }

    fn expect_step(&self, expected: CheckoutStep) -> CoreResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CoreError::WrongCheckoutStep {
                current: self.step,
                expected,
            })
        }
    }

    /// Stores contact and address details and moves to review.
    pub fn submit_shipping(
        &mut self,
        customer: CustomerDetails,
        shipping_address: ShippingAddress,
        notes: Option<String>,
    ) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Shipping)?;
        crate::validation::validate_customer(&customer)?;
        crate::validation::validate_shipping_address(&shipping_address)?;

        self.customer = Some(customer);
        self.shipping_address = Some(shipping_address);
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Review → Shipping. Entered details are kept for editing.
    pub fn back(&mut self) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Review)?;
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Builds the order body from the cart.
    ///
    /// Zero-quantity lines are skipped. Fails with [`CoreError::EmptyOrder`]
    /// when nothing purchasable remains.
    pub fn build_order_request(&self, cart: &CartState) -> CoreResult<GuestOrderRequest> {
        self.expect_step(CheckoutStep::Review)?;

        let (customer, shipping_address) = match (&self.customer, &self.shipping_address) {
            (Some(c), Some(a)) => (c.clone(), a.clone()),
            _ => {
                return Err(CoreError::WrongCheckoutStep {
                    current: self.step,
                    expected: CheckoutStep::Shipping,
                })
            }
        };

        let items: Vec<OrderLineRequest> = cart
            .items
            .iter()
            .filter(|line| line.quantity > 0)
            .map(|line| OrderLineRequest {
                sku: line.sku.clone(),
                quantity: line.quantity,
            })
            .collect();

        if items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let request = GuestOrderRequest {
            customer,
            shipping_address,
            items,
            notes: self.notes.clone(),
        };
        validate_guest_order(&request)?;
        Ok(request)
    }

    /// Records the placed order and moves to confirmation.
    pub fn confirm(&mut self, order: Order) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Review)?;
        self.confirmed = Some(order);
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }

    /// Starts a fresh checkout.
    pub fn reset(&mut self) {
        *self = Checkout::default();
    }
}

//! # Customer
//!
//! A shopper with a membership tier and exactly one cart.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use ts_rs::TS;

use crate::cart::Cart;
use crate::config::LoyaltyPolicy;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::MembershipTier;
use crate::validation::validate_required;

/// Address used until the customer provides one.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Who the customer is, without the cart. Receipts print a copy of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerProfile {
    pub name: String,
    pub email: String,
    pub address: String,
    pub membership: MembershipTier,
}

/// A customer and their cart.
#[derive(Debug)]
pub struct Customer {
    profile: CustomerProfile,
    cart: Cart,
}

impl Customer {
    /// Creates a customer with an empty cart and an unknown address.
    ///
    /// ## Errors
    /// `ValidationError::Required` when name or email is blank.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        membership: MembershipTier,
    ) -> CoreResult<Self> {
        let name = name.into();
        let email = email.into();
        validate_required("name", &name)?;
        validate_required("email", &email)?;

        Ok(Customer {
            profile: CustomerProfile {
                name,
                email,
                address: UNKNOWN_ADDRESS.to_string(),
                membership,
            },
            cart: Cart::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn address(&self) -> &str {
        &self.profile.address
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.profile.address = address.into();
    }

    pub fn membership(&self) -> MembershipTier {
        self.profile.membership
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Loyalty discount on the current cart subtotal (pre-tax, pre-shipping).
    ///
    /// Regular 0%, Premium 5%, VIP 10%.
    pub fn calculate_loyalty_discount(&self) -> Money {
        self.calculate_loyalty_discount_with(&LoyaltyPolicy::default())
    }

    /// Same as [`Customer::calculate_loyalty_discount`] with configured percentages.
    pub fn calculate_loyalty_discount_with(&self, policy: &LoyaltyPolicy) -> Money {
        policy.discount_for(self.profile.membership, self.cart.subtotal())
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Shared, mutable handle to a [`Customer`].
///
/// An order holds one of these, so its receipt shows the customer's
/// current address and loyalty discount.
#[derive(Debug, Clone)]
pub struct CustomerRef(Rc<RefCell<Customer>>);

impl CustomerRef {
    pub fn new(customer: Customer) -> Self {
        CustomerRef(Rc::new(RefCell::new(customer)))
    }

    pub fn borrow(&self) -> Ref<'_, Customer> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Customer> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same customer.
    pub fn same_customer(&self, other: &CustomerRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Customer> for CustomerRef {
    fn from(customer: Customer) -> Self {
        CustomerRef::new(customer)
    }
}

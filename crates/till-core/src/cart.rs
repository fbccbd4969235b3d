//! # Cart
//!
//! A customer's shopping cart, tied to live product inventory.
//!
//! ## Reservation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart ⇄ Inventory                                     │
//! │                                                                         │
//! │  Action                       Cart line          Product stock          │
//! │  ──────                       ─────────          ─────────────          │
//! │  add_product(laptop, 2)       qty += 2           stock -= 2             │
//! │  update_quantity(laptop, 5)   qty = 5            stock -= 3             │
//! │  update_quantity(laptop, 1)   qty = 1            stock += 4             │
//! │  remove_product(laptop)       line removed       stock += 1             │
//! │                                                                         │
//! │  For every product: cart qty + stock == stock before it was added      │
//! │  Every check runs before the first mutation.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines keep insertion order, which is the order receipts print in.
//! Products are matched by handle identity (see [`ProductRef`]).
//!
//! Cart operations borrow each product mutably for the duration of the
//! call, so callers must not hold a `ProductRef::borrow()` guard across them.

use serde::Serialize;
use tracing::debug;

use crate::error::{CoreResult, StateError, ValidationError};
use crate::money::Money;
use crate::product::{Product, ProductRef};
use crate::validation::{validate_count_sum, validate_non_negative, validate_quantity};

// =============================================================================
// Cart Line
// =============================================================================

/// One product and the quantity reserved for it.
#[derive(Debug, Clone)]
pub struct CartLine {
    product: ProductRef,
    quantity: i64,
}

impl CartLine {
    pub fn product(&self) -> &ProductRef {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Current unit price × quantity.
    pub fn line_subtotal(&self) -> Money {
        self.product.borrow().price() * self.quantity
    }

    /// Unit tax × quantity.
    pub fn line_tax(&self) -> Money {
        self.product.borrow().calculate_tax() * self.quantity
    }
}

/// Rejects a line whose subtotal or tax would not fit in a `Decimal`.
///
/// Prices only ever go down after a line is reserved, so a line that fits
/// here keeps fitting.
fn validate_line_fits(product: &Product, quantity: i64) -> CoreResult<()> {
    let fits = product.price().checked_multiply_quantity(quantity).is_some()
        && product.calculate_tax().checked_multiply_quantity(quantity).is_some();
    if !fits {
        return Err(ValidationError::TooLarge {
            field: "line total".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per product handle
/// - Quantities are never negative (a line may sit at zero after
///   `update_quantity(p, 0)`)
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    fn position_of(&self, product: &ProductRef) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.same_product(product))
    }

    /// Reserves `quantity` units of `product` and records them in the cart.
    ///
    /// ## Behavior
    /// - If product already in cart: increases quantity
    /// - If product not in cart: appends a new line
    ///
    /// ## Errors
    /// - `ValidationError` when `quantity <= 0`
    /// - `StateError::InsufficientStock` when stock is below `quantity`;
    ///   neither the cart nor the stock changes
    pub fn add_product(&mut self, product: &ProductRef, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let pos = self.position_of(product);
        let current = pos.map_or(0, |pos| self.lines[pos].quantity);
        let new_quantity = validate_count_sum("quantity", current, quantity)?;

        {
            let mut item = product.borrow_mut();
            validate_line_fits(&item, new_quantity)?;
            if item.inventory_count() < quantity {
                return Err(StateError::InsufficientStock {
                    product_id: item.id().to_string(),
                    available: item.inventory_count(),
                    requested: quantity,
                }
                .into());
            }
            item.decrease_inventory(quantity)?;
        }

        match pos {
            Some(pos) => self.lines[pos].quantity = new_quantity,
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }

        debug!(product_id = %product.id(), quantity, "Added to cart");
        Ok(())
    }

    /// Drops the product's line and returns its whole quantity to stock.
    ///
    /// Removing a product that is not in the cart does nothing.
    pub fn remove_product(&mut self, product: &ProductRef) -> CoreResult<()> {
        let Some(pos) = self.position_of(product) else {
            return Ok(());
        };

        let quantity = self.lines[pos].quantity;
        product.borrow_mut().increase_inventory(quantity)?;
        self.lines.remove(pos);

        debug!(product_id = %product.id(), released = quantity, "Removed from cart");
        Ok(())
    }

    /// Sets the quantity of a product already in the cart.
    ///
    /// Only the difference is reserved or released. Setting zero keeps a
    /// zero-quantity line; use [`Cart::remove_product`] to drop it.
    ///
    /// ## Errors
    /// - `StateError::NotInCart` when the product has no line
    /// - `ValidationError` when `new_quantity` is negative
    /// - `StateError::InsufficientStock` when the increase cannot be
    ///   reserved; quantity and stock stay as they were
    pub fn update_quantity(&mut self, product: &ProductRef, new_quantity: i64) -> CoreResult<()> {
        let pos = self
            .position_of(product)
            .ok_or_else(|| StateError::NotInCart {
                product_id: product.id(),
            })?;
        validate_non_negative("quantity", new_quantity)?;
        validate_line_fits(&product.borrow(), new_quantity)?;

        let current = self.lines[pos].quantity;
        let delta = new_quantity - current;
        if delta > 0 {
            product.borrow_mut().decrease_inventory(delta)?;
        } else if delta < 0 {
            product.borrow_mut().increase_inventory(-delta)?;
        }
        self.lines[pos].quantity = new_quantity;

        debug!(product_id = %product.id(), from = current, to = new_quantity, "Cart quantity updated");
        Ok(())
    }

    /// Releases every reservation and empties the cart.
    pub fn clear(&mut self) -> CoreResult<()> {
        while let Some(line) = self.lines.pop() {
            let result = line.product.borrow_mut().increase_inventory(line.quantity);
            if let Err(e) = result {
                self.lines.push(line);
                return Err(e);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The live lines, in the order products were first added.
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity reserved for `product`, if it has a line.
    pub fn quantity_of(&self, product: &ProductRef) -> Option<i64> {
        self.position_of(product).map(|pos| self.lines[pos].quantity)
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of current price × quantity; reflects discounts already applied.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_subtotal).sum()
    }

    /// Sum of unit tax × quantity.
    pub fn total_tax(&self) -> Money {
        self.lines.iter().map(CartLine::line_tax).sum()
    }

    /// Subtotal plus tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.total_tax()
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let tax = cart.total_tax();
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

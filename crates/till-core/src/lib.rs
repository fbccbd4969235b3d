//! # till-core: Checkout Logic for Till
//!
//! This crate holds the whole checkout model: products, carts with stock
//! reservation, customers with loyalty tiers, orders and receipts. It does
//! no I/O of its own.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till-demo (binary)                           │   │
//! │  │    config.toml ──► tracing ──► checkout scenario ──► stdout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │   cart    │  │ customer  │  │   order   │  │   │
//! │  │   │ Product   │  │   Cart    │  │ Customer  │  │  Order    │  │   │
//! │  │   │ProductRef │  │ CartLine  │  │  Profile  │  │  Receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   money • types • validation • config • error                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Fulfillment trait                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              payment / fulfillment (external)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - Product catalog entries and shared handles
//! - [`cart`] - Cart lines with inventory reservation
//! - [`customer`] - Customer, profile and loyalty discount
//! - [`order`] - Order snapshot, shipping, fulfillment hook
//! - [`receipt`] - Structured receipt and its text layout
//! - [`money`] - Decimal money type
//! - [`types`] - Tax rates, membership tiers, shipping methods
//! - [`config`] - Shipping, loyalty and store settings
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules
//!
//! ## Design Principles
//!
//! 1. **Reserve on add**: putting an item in a cart takes it out of stock
//! 2. **Exact money**: amounts are decimals, rounded only for display
//! 3. **Explicit Errors**: every failure is a typed [`CoreError`], never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use till_core::{
//!     Customer, CustomerRef, MembershipTier, Money, Order, OrderIdGenerator, Product, ProductRef,
//! };
//!
//! let laptop: ProductRef = Product::electronic(
//!     "E001", "Laptop", Money::from_cents(120_000), 10, 24, Decimal::new(25, 1),
//! )
//! .unwrap()
//! .into();
//!
//! let customer: CustomerRef = Customer::new("Ada", "ada@example.com", MembershipTier::Premium)
//!     .unwrap()
//!     .into();
//! customer.borrow_mut().cart_mut().add_product(&laptop, 1).unwrap();
//! assert_eq!(laptop.borrow().inventory_count(), 9);
//!
//! let ids = OrderIdGenerator::new();
//! let receipt = Order::new(&customer, &ids, None).generate_receipt();
//!
//! // 1200.00 + 99.00 tax + 5.00 shipping - 60.00 loyalty
//! assert_eq!(receipt.summary.total, Money::from_cents(124_400));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod customer;
pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals};
pub use config::{CheckoutConfig, LoyaltyPolicy, ShippingPolicy};
pub use customer::{Customer, CustomerProfile, CustomerRef};
pub use error::{CoreError, CoreResult, StateError, ValidationError};
pub use money::Money;
pub use order::{Fulfillment, NoopFulfillment, Order, OrderIdGenerator};
pub use product::{HasShippingWeight, Product, ProductKind, ProductRef};
pub use receipt::{Receipt, ReceiptLine, ReceiptSummary};
pub use types::*;

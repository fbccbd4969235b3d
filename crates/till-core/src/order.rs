//! # Orders
//!
//! An order freezes a customer's cart and prices it for checkout.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── Order::new(&customer, &ids, None)                              │
//! │         • id from OrderIdGenerator: ORD-2026-001                       │
//! │         • copies cart lines, keeps a handle to the customer            │
//! │                                                                         │
//! │  2. PRICE                                                              │
//! │     └── calculate_shipping_cost()  weight × method rate, $5.00 floor   │
//! │     └── generate_receipt()         subtotal + tax + ship - loyalty     │
//! │                                                                         │
//! │  3. HAND OFF                                                           │
//! │     └── process_order(&fulfillment) → payment / picking systems       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The line snapshot is a copy of the cart at creation time. The products
//! themselves are still shared, so a later price change on a product shows
//! up when the receipt is generated. The customer is shared too: the
//! receipt prints their current details and loyalty discount.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{info, warn};

use crate::cart::CartLine;
use crate::config::{CheckoutConfig, ShippingPolicy};
use crate::customer::CustomerRef;
use crate::error::CoreResult;
use crate::money::Money;
use crate::product::{HasShippingWeight, ProductKind};
use crate::receipt::{Receipt, ReceiptLine, ReceiptSummary};
use crate::types::ShippingMethod;

/// Default prefix of generated order ids.
pub const DEFAULT_ORDER_PREFIX: &str = "ORD";

// =============================================================================
// Order Id Generator
// =============================================================================

/// Hands out sequential order ids: `ORD-<year>-<seq>`.
///
/// Create one per process (or per test) and pass it to every
/// [`Order::new`] call. The counter starts at 1 and is atomic, so a
/// generator shared between threads never repeats a number.
///
/// ## Example
/// ```rust
/// use till_core::order::OrderIdGenerator;
///
/// let ids = OrderIdGenerator::new();
/// assert_eq!(ids.next_id_for_year(2024), "ORD-2024-001");
/// assert_eq!(ids.next_id_for_year(2024), "ORD-2024-002");
/// ```
#[derive(Debug)]
pub struct OrderIdGenerator {
    prefix: String,
    next: AtomicU32,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ORDER_PREFIX)
    }

    /// Generator with a custom prefix (e.g. from `CheckoutConfig::order_prefix`).
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        OrderIdGenerator {
            prefix: prefix.into(),
            next: AtomicU32::new(1),
        }
    }

    /// Next id stamped with the current year.
    pub fn next_id(&self) -> String {
        self.next_id_for_year(Utc::now().year())
    }

    /// Next id stamped with `year`.
    pub fn next_id_for_year(&self, year: i32) -> String {
        let seq = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}-{:03}", self.prefix, year, seq)
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Fulfillment Hook
// =============================================================================

/// Payment / fulfillment system that takes over a priced order.
pub trait Fulfillment {
    /// Starts processing `order`. Failures are reported as
    /// `CoreError::Fulfillment`.
    fn fulfill(&self, order: &Order) -> CoreResult<()>;
}

/// Fulfillment that accepts every order and does nothing.
pub struct NoopFulfillment;

impl Fulfillment for NoopFulfillment {
    fn fulfill(&self, _order: &Order) -> CoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A checked-out copy of a customer's cart.
#[derive(Debug, Clone)]
pub struct Order {
    id: String,
    customer: CustomerRef,
    created_at: DateTime<Utc>,
    shipping_method: ShippingMethod,
    items: Vec<CartLine>,
}

impl Order {
    /// Snapshots `customer`'s cart into a new order.
    ///
    /// A missing or blank `id` is replaced by the generator's next id.
    /// Shipping starts as [`ShippingMethod::Standard`].
    pub fn new(customer: &CustomerRef, ids: &OrderIdGenerator, id: Option<&str>) -> Self {
        let id = match id.map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => ids.next_id(),
        };

        let items = {
            let shopper = customer.borrow();
            info!(
                order_id = %id,
                lines = shopper.cart().item_count(),
                customer = %shopper.email(),
                "Order created"
            );
            shopper.cart().items().to_vec()
        };

        Order {
            id,
            customer: customer.clone(),
            created_at: Utc::now(),
            shipping_method: ShippingMethod::default(),
            items,
        }
    }

    /// Sets the shipping method while building.
    pub fn with_shipping_method(mut self, method: ShippingMethod) -> Self {
        self.shipping_method = method;
        self
    }

    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        self.shipping_method = method;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer(&self) -> &CustomerRef {
        &self.customer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// The cart lines as they were when the order was created.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Sum of current price × snapshot quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLine::line_subtotal).sum()
    }

    /// Sum of unit tax × snapshot quantity.
    pub fn total_tax(&self) -> Money {
        self.items.iter().map(CartLine::line_tax).sum()
    }

    /// Total shipping weight: Σ unit weight × quantity.
    pub fn total_weight(&self) -> Decimal {
        self.items
            .iter()
            .map(|line| line.product().shipping_weight() * Decimal::from(line.quantity()))
            .sum()
    }

    /// Shipping cost under the standard policy.
    ///
    /// Standard ×1, Express ×3, Next Day ×5 per unit of weight, never less
    /// than $5.00.
    pub fn calculate_shipping_cost(&self) -> Money {
        self.calculate_shipping_cost_with(&ShippingPolicy::default())
    }

    /// Shipping cost under a configured policy.
    pub fn calculate_shipping_cost_with(&self, policy: &ShippingPolicy) -> Money {
        policy.cost_for_weight(self.total_weight(), self.shipping_method)
    }

    /// Hands the order to a payment / fulfillment system.
    pub fn process_order(&self, fulfillment: &dyn Fulfillment) -> CoreResult<()> {
        info!(order_id = %self.id, "Processing order");
        fulfillment.fulfill(self).map_err(|e| {
            warn!(order_id = %self.id, error = %e, "Fulfillment failed");
            e
        })
    }

    /// Prices the order with the default checkout rules.
    pub fn generate_receipt(&self) -> Receipt {
        self.generate_receipt_with(&CheckoutConfig::default())
    }

    /// Prices the order with `config`.
    ///
    /// Lines, tax and shipping come from the snapshot. The loyalty discount
    /// and the customer block come from the customer as they are now.
    /// Nothing is mutated.
    pub fn generate_receipt_with(&self, config: &CheckoutConfig) -> Receipt {
        let lines: Vec<ReceiptLine> = self.items.iter().map(receipt_line).collect();

        let subtotal: Money = lines.iter().map(|line| line.line_subtotal).sum();
        let tax: Money = lines.iter().map(|line| line.line_tax).sum();
        let customer = self.customer.borrow();
        let loyalty_percent = config.loyalty.percent_for(customer.membership());
        let loyalty_discount = customer.calculate_loyalty_discount_with(&config.loyalty);
        let shipping = self.calculate_shipping_cost_with(&config.shipping);

        Receipt {
            store_name: config.store_name.clone(),
            order_id: self.id.clone(),
            created_at: self.created_at,
            customer: customer.profile().clone(),
            lines,
            summary: ReceiptSummary {
                subtotal,
                tax,
                loyalty_percent,
                loyalty_discount,
                shipping_method: self.shipping_method,
                shipping,
                total: subtotal + tax + shipping - loyalty_discount,
            },
        }
    }
}

/// Display markup shown as "original price" on discountable items.
fn display_markup() -> Decimal {
    Decimal::new(110, 2)
}

fn receipt_line(line: &CartLine) -> ReceiptLine {
    let product = line.product().borrow();
    let quantity = line.quantity();
    let unit_price = product.price();
    let unit_tax = product.calculate_tax();

    // Always a flat 10% markup, regardless of discounts actually applied.
    let original_price = if product.is_discountable() {
        unit_price * display_markup()
    } else {
        unit_price
    };

    let details = match product.kind() {
        ProductKind::Electronic { .. } => Vec::new(),
        ProductKind::Book { author, isbn } => {
            vec![format!("Author: {}", author), format!("ISBN: {}", isbn)]
        }
        ProductKind::Clothing { size, color } => {
            vec![format!("Size: {}", size), format!("Color: {}", color)]
        }
    };

    ReceiptLine {
        product_id: product.id().to_string(),
        name: product.name().to_string(),
        category: product.category().to_string(),
        original_price,
        discount: original_price - unit_price,
        unit_price,
        unit_tax,
        quantity,
        line_subtotal: unit_price * quantity,
        line_tax: unit_tax * quantity,
        details,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::Customer;
    use crate::error::CoreError;
    use crate::product::{Product, ProductRef};
    use crate::types::MembershipTier;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn laptop() -> ProductRef {
        Product::electronic("E001", "Laptop", Money::new(dec!(1200.00)), 10, 24, dec!(2.5))
            .unwrap()
            .into()
    }

    fn book() -> ProductRef {
        Product::book("B001", "Rust Book", Money::new(dec!(45.00)), 10, "Steve", "978-1", dec!(0.8))
            .unwrap()
            .into()
    }

    fn tshirt() -> ProductRef {
        Product::clothing("C001", "T-Shirt", Money::new(dec!(20.00)), 10, "M", "Blue", dec!(0.2))
            .unwrap()
            .into()
    }

    fn premium_customer() -> CustomerRef {
        let mut customer =
            Customer::new("Ada Lovelace", "ada@example.com", MembershipTier::Premium).unwrap();
        customer.set_address("1 Analytical Way");
        customer.into()
    }

    #[test]
    fn test_generated_ids_increase() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        let year = Utc::now().year();

        let first = Order::new(&customer, &ids, None);
        let second = Order::new(&customer, &ids, Some("   "));

        assert_eq!(first.id(), format!("ORD-{}-001", year));
        assert_eq!(second.id(), format!("ORD-{}-002", year));
    }

    #[test]
    fn test_explicit_id_does_not_consume_sequence() {
        let ids = OrderIdGenerator::with_prefix("WEB");
        let customer = premium_customer();

        let explicit = Order::new(&customer, &ids, Some("CUSTOM-1"));
        assert_eq!(explicit.id(), "CUSTOM-1");
        assert_eq!(ids.next_id_for_year(2024), "WEB-2024-001");
    }

    #[test]
    fn test_snapshot_ignores_later_cart_changes() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        let product = book();
        customer.borrow_mut().cart_mut().add_product(&product, 2).unwrap();

        let order = Order::new(&customer, &ids, None);
        customer.borrow_mut().cart_mut().update_quantity(&product, 5).unwrap();
        customer.borrow_mut().cart_mut().add_product(&laptop(), 1).unwrap();

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity(), 2);
        assert_eq!(order.subtotal().amount(), dec!(90.00));
    }

    #[test]
    fn test_express_shipping_by_weight() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        customer.borrow_mut().cart_mut().add_product(&laptop(), 1).unwrap();
        customer.borrow_mut().cart_mut().add_product(&book(), 2).unwrap();

        let order = Order::new(&customer, &ids, None).with_shipping_method(ShippingMethod::Express);

        assert_eq!(order.total_weight(), dec!(4.1));
        assert_eq!(order.calculate_shipping_cost().amount(), dec!(12.30));
    }

    #[test]
    fn test_light_order_hits_shipping_floor() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        let feather: ProductRef =
            Product::electronic("E002", "Earbuds", Money::new(dec!(30)), 5, 6, dec!(0.5))
                .unwrap()
                .into();
        customer.borrow_mut().cart_mut().add_product(&feather, 2).unwrap();

        let order = Order::new(&customer, &ids, None);

        assert_eq!(order.total_weight(), dec!(1.0));
        assert_eq!(order.calculate_shipping_cost(), Money::from_cents(500));
    }

    #[test]
    fn test_next_day_rate() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        customer.borrow_mut().cart_mut().add_product(&laptop(), 1).unwrap();

        let mut order = Order::new(&customer, &ids, None);
        order.set_shipping_method(ShippingMethod::NextDay);

        assert_eq!(order.calculate_shipping_cost().amount(), dec!(12.5));
    }

    #[test]
    fn test_receipt_totals() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        let computer = laptop();
        customer.borrow_mut().cart_mut().add_product(&computer, 1).unwrap();
        customer.borrow_mut().cart_mut().add_product(&book(), 2).unwrap();
        customer.borrow_mut().cart_mut().add_product(&tshirt(), 1).unwrap();

        let order = Order::new(&customer, &ids, None).with_shipping_method(ShippingMethod::Express);
        let receipt = order.generate_receipt();
        let summary = &receipt.summary;

        // 1200 + 90 + 20
        assert_eq!(summary.subtotal.amount(), dec!(1310.00));
        // 99 + 5.40 + 1.50
        assert_eq!(summary.tax.amount(), dec!(105.90));
        assert_eq!(summary.loyalty_percent, dec!(5));
        assert_eq!(summary.loyalty_discount.amount(), dec!(65.50));
        // (2.5 + 1.6 + 0.2) × 3
        assert_eq!(summary.shipping.amount(), dec!(12.90));
        assert_eq!(summary.total.amount(), dec!(1363.30));
        assert_eq!(
            summary.total,
            summary.subtotal + summary.tax + summary.shipping - summary.loyalty_discount
        );
        assert_eq!(summary.loyalty_discount, customer.borrow().calculate_loyalty_discount());
    }

    #[test]
    fn test_receipt_reads_live_customer() {
        let ids = OrderIdGenerator::new();
        let customer: CustomerRef = Customer::new("Grace", "grace@example.com", MembershipTier::Vip)
            .unwrap()
            .into();
        let novel: ProductRef =
            Product::book("B100", "Novel", Money::from_cents(10_000), 3, "Anon", "978-9", dec!(0.8))
                .unwrap()
                .into();
        customer.borrow_mut().cart_mut().add_product(&novel, 1).unwrap();

        let order = Order::new(&customer, &ids, None);
        customer.borrow_mut().cart_mut().clear().unwrap();
        customer.borrow_mut().set_address("New Street");

        let receipt = order.generate_receipt();
        let summary = &receipt.summary;

        assert_eq!(receipt.customer.address, "New Street");
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(summary.subtotal, Money::from_cents(10_000));
        assert!(summary.loyalty_discount.is_zero());
        assert_eq!(summary.loyalty_discount, customer.borrow().calculate_loyalty_discount());
        // 100 + 6 tax + 5 minimum shipping
        assert_eq!(summary.total.amount(), dec!(111.00));
        assert!(order.customer().same_customer(&customer));
    }

    #[test]
    fn test_receipt_lines_keep_insertion_order_and_markup() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        let computer = laptop();
        customer.borrow_mut().cart_mut().add_product(&tshirt(), 1).unwrap();
        customer.borrow_mut().cart_mut().add_product(&computer, 1).unwrap();
        customer.borrow_mut().cart_mut().add_product(&book(), 2).unwrap();
        computer.borrow_mut().apply_discount(dec!(10)).unwrap();

        let receipt = Order::new(&customer, &ids, None).generate_receipt();
        let ids_in_order: Vec<&str> = receipt.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids_in_order, ["C001", "E001", "B001"]);

        let shirt = &receipt.lines[0];
        assert_eq!(shirt.original_price, shirt.unit_price);
        assert!(shirt.discount.is_zero());
        assert_eq!(shirt.details, ["Size: M", "Color: Blue"]);

        // The markup ignores the real 10% discount already applied.
        let computer_line = &receipt.lines[1];
        assert_eq!(computer_line.unit_price.amount(), dec!(1080.00));
        assert_eq!(computer_line.original_price.amount(), dec!(1188.00));
        assert_eq!(computer_line.discount.amount(), dec!(108.00));
        assert_eq!(computer_line.unit_tax.amount(), dec!(89.10));
        assert!(computer_line.details.is_empty());

        let book_line = &receipt.lines[2];
        assert_eq!(book_line.line_subtotal.amount(), dec!(90.00));
        assert_eq!(book_line.line_tax.amount(), dec!(5.40));
        assert_eq!(book_line.details, ["Author: Steve", "ISBN: 978-1"]);
    }

    #[test]
    fn test_receipt_with_config() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        customer.borrow_mut().cart_mut().add_product(&book(), 1).unwrap();
        let order = Order::new(&customer, &ids, None);

        let mut config = CheckoutConfig::default();
        config.store_name = "Corner Shop".to_string();
        config.shipping.minimum_charge = Money::from_cents(750);

        let receipt = order.generate_receipt_with(&config);
        assert_eq!(receipt.store_name, "Corner Shop");
        assert_eq!(receipt.summary.shipping, Money::from_cents(750));
    }

    #[test]
    fn test_receipt_text() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        customer.borrow_mut().cart_mut().add_product(&laptop(), 1).unwrap();
        customer.borrow_mut().cart_mut().add_product(&book(), 2).unwrap();

        let order = Order::new(&customer, &ids, Some("ORD-2024-042"))
            .with_shipping_method(ShippingMethod::Express);
        let mut receipt = order.generate_receipt();
        receipt.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        let expected = "\
==================================================
Till Store
ORDER RECEIPT
==================================================
Order ID: ORD-2024-042
Date: 2024-03-01 09:30:00 UTC
--------------------------------------------------
Customer: Ada Lovelace
Email: ada@example.com
Address: 1 Analytical Way
Membership: Premium
--------------------------------------------------
ITEMS
--------------------------------------------------
Laptop (E001)
  Original price: $1320.00
  Discount: -$120.00
  Unit price: $1200.00 x 1
  Subtotal: $1200.00
  Tax: $99.00
Rust Book (B001)
  Original price: $49.50
  Discount: -$4.50
  Unit price: $45.00 x 2
  Subtotal: $90.00
  Tax: $5.40
  Author: Steve
  ISBN: 978-1
--------------------------------------------------
Subtotal:                                 $1290.00
Tax:                                       $104.40
Loyalty discount (5%):                     -$64.50
Shipping (Express):                         $12.30
--------------------------------------------------
TOTAL:                                    $1342.20
==================================================";

        assert_eq!(receipt.to_string(), expected);
    }

    #[test]
    fn test_receipt_json() {
        let ids = OrderIdGenerator::new();
        let customer = premium_customer();
        customer.borrow_mut().cart_mut().add_product(&book(), 1).unwrap();

        let json = Order::new(&customer, &ids, None).generate_receipt().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["customer"]["membership"], "premium");
        assert_eq!(value["summary"]["shippingMethod"], "standard");
        assert_eq!(value["lines"][0]["productId"], "B001");
    }

    struct RejectingFulfillment;

    impl Fulfillment for RejectingFulfillment {
        fn fulfill(&self, order: &Order) -> CoreResult<()> {
            Err(CoreError::Fulfillment {
                order_id: order.id().to_string(),
                reason: "card declined".to_string(),
            })
        }
    }

    #[test]
    fn test_process_order_delegates() {
        let ids = OrderIdGenerator::new();
        let order = Order::new(&premium_customer(), &ids, None);

        assert!(order.process_order(&NoopFulfillment).is_ok());

        let err = order.process_order(&RejectingFulfillment).unwrap_err();
        assert!(matches!(err, CoreError::Fulfillment { ref reason, .. } if reason == "card declined"));
    }
}

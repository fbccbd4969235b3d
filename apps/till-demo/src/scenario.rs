//! Scripted checkout used by the demo binary.
//!
//! Rejected operations are logged and the script keeps going, the way a
//! register would after showing the cashier an error.

use rust_decimal::Decimal;
use till_core::{
    CartTotals, CheckoutConfig, CoreResult, Customer, CustomerRef, MembershipTier, Money,
    NoopFulfillment, Order, OrderIdGenerator, Product, ProductRef, Receipt, ShippingMethod,
};
use tracing::{info, warn};

use crate::error::DemoResult;

/// Products on the demo shelf.
pub struct Catalog {
    pub laptop: ProductRef,
    pub book: ProductRef,
    pub tshirt: ProductRef,
}

impl Catalog {
    pub fn stock() -> CoreResult<Self> {
        let laptop = Product::electronic(
            "E001",
            "Laptop",
            Money::from_cents(120_000),
            10,
            24,
            Decimal::new(25, 1),
        )?
        .with_description("14-inch ultrabook");

        let book = Product::book(
            "B001",
            "The Rust Programming Language",
            Money::from_cents(4_500),
            25,
            "Steve Klabnik",
            "978-1718503106",
            Decimal::new(8, 1),
        )?;

        let tshirt = Product::clothing(
            "C001",
            "T-Shirt",
            Money::from_cents(2_000),
            2,
            "M",
            "Blue",
            Decimal::new(2, 1),
        )?;

        Ok(Catalog {
            laptop: laptop.into(),
            book: book.into(),
            tshirt: tshirt.into(),
        })
    }
}

/// Logs a rejected operation and carries on.
fn report<T>(action: &str, result: CoreResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(action, error = %e, "Operation rejected");
            None
        }
    }
}

/// Runs one checkout and returns its receipt.
pub fn run_checkout(config: &CheckoutConfig) -> DemoResult<Receipt> {
    let catalog = Catalog::stock()?;
    info!(
        details = %catalog.laptop.borrow().details(),
        "Catalog ready"
    );

    let ids = OrderIdGenerator::with_prefix(config.order_prefix.clone());

    let customer: CustomerRef =
        Customer::new("Ada Lovelace", "ada@example.com", MembershipTier::Premium)?.into();
    customer
        .borrow_mut()
        .set_address("12 Analytical Engine Row, London");

    report("discount laptop", catalog.laptop.borrow_mut().apply_discount(Decimal::TEN));
    report("discount t-shirt", catalog.tshirt.borrow_mut().apply_discount(Decimal::TEN));

    {
        let mut shopper = customer.borrow_mut();
        let cart = shopper.cart_mut();
        report("add laptop", cart.add_product(&catalog.laptop, 1));
        report("add books", cart.add_product(&catalog.book, 2));
        report("add t-shirts", cart.add_product(&catalog.tshirt, 3));
        report("add t-shirt", cart.add_product(&catalog.tshirt, 1));
        report("update books", cart.update_quantity(&catalog.book, 3));
        report("update books", cart.update_quantity(&catalog.book, 2));
    }

    {
        let shopper = customer.borrow();
        let totals = CartTotals::from(shopper.cart());
        info!(
            items = totals.item_count,
            quantity = totals.total_quantity,
            subtotal = %totals.subtotal,
            tax = %totals.tax,
            total = %totals.total,
            loyalty = %shopper.calculate_loyalty_discount_with(&config.loyalty),
            "Cart ready"
        );
    }

    let order = Order::new(&customer, &ids, None).with_shipping_method(ShippingMethod::Express);
    order.process_order(&NoopFulfillment)?;

    Ok(order.generate_receipt_with(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checkout_with_defaults() {
        let receipt = run_checkout(&CheckoutConfig::default()).unwrap();

        // 1080 + 90 + 20
        assert_eq!(receipt.summary.subtotal.amount(), dec!(1190.00));
        // 89.10 + 5.40 + 1.50
        assert_eq!(receipt.summary.tax.amount(), dec!(96.00));
        // (2.5 + 1.6 + 0.2) × 3
        assert_eq!(receipt.summary.shipping.amount(), dec!(12.90));
        assert_eq!(receipt.summary.loyalty_discount.amount(), dec!(59.50));
        assert_eq!(receipt.summary.total.amount(), dec!(1239.40));
        assert_eq!(receipt.lines.len(), 3);
        assert!(receipt.order_id.starts_with("ORD-"));
    }

    #[test]
    fn test_checkout_uses_configured_prefix_and_store() {
        let config = CheckoutConfig {
            store_name: "Corner Shop".to_string(),
            order_prefix: "WEB".to_string(),
            ..CheckoutConfig::default()
        };

        let receipt = run_checkout(&config).unwrap();
        assert!(receipt.order_id.starts_with("WEB-"));
        assert!(receipt.to_string().contains("Corner Shop"));
    }
}

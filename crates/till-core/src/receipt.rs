//! # Receipt
//!
//! Structured receipt produced by [`Order::generate_receipt`] and its text
//! rendering.
//!
//! ## Layout
//! ```text
//! ==================================================
//! Till Store
//! ORDER RECEIPT
//! ==================================================
//! Order ID: ORD-2026-001
//! Date: 2026-10-16 09:30:00 UTC
//! --------------------------------------------------
//! Customer: Ada Lovelace
//! ...
//! ITEMS
//! --------------------------------------------------
//! Laptop (E001)
//!   Original price: $1320.00
//!   Discount: -$120.00
//!   ...
//! --------------------------------------------------
//! Subtotal:                                 $1290.00
//! ...
//! TOTAL:                                    $1342.20
//! ==================================================
//! ```
//!
//! [`Order::generate_receipt`]: crate::order::Order::generate_receipt

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::customer::CustomerProfile;
use crate::money::Money;
use crate::types::ShippingMethod;

const WIDTH: usize = 50;

/// One printed item line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Display-only list price: unit price plus 10% for discountable products.
    pub original_price: Money,
    /// Display-only difference between `original_price` and `unit_price`.
    pub discount: Money,
    pub unit_price: Money,
    pub unit_tax: Money,
    pub quantity: i64,
    pub line_subtotal: Money,
    pub line_tax: Money,
    /// Extra attribute lines; only books and clothing print any.
    pub details: Vec<String>,
}

/// Totals block at the bottom of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub subtotal: Money,
    pub tax: Money,
    #[ts(type = "string")]
    pub loyalty_percent: Decimal,
    pub loyalty_discount: Money,
    pub shipping_method: ShippingMethod,
    pub shipping: Money,
    /// subtotal + tax + shipping - loyalty_discount
    pub total: Money,
}

/// A complete priced receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store_name: String,
    pub order_id: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub customer: CustomerProfile,
    pub lines: Vec<ReceiptLine>,
    pub summary: ReceiptSummary,
}

impl Receipt {
    /// Serializes the receipt for clients that render it themselves.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Renders an amount taken off the bill; zero prints without a sign.
fn as_deduction(amount: Money) -> String {
    if amount.is_zero() {
        amount.to_string()
    } else {
        format!("-{}", amount)
    }
}

fn write_amount(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    let pad = WIDTH.saturating_sub(label.len());
    writeln!(f, "{}{:>pad$}", label, value, pad = pad)
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(WIDTH);
        let light = "-".repeat(WIDTH);

        writeln!(f, "{}", heavy)?;
        writeln!(f, "{}", self.store_name)?;
        writeln!(f, "ORDER RECEIPT")?;
        writeln!(f, "{}", heavy)?;
        writeln!(f, "Order ID: {}", self.order_id)?;
        writeln!(f, "Date: {}", self.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "{}", light)?;
        writeln!(f, "Customer: {}", self.customer.name)?;
        writeln!(f, "Email: {}", self.customer.email)?;
        writeln!(f, "Address: {}", self.customer.address)?;
        writeln!(f, "Membership: {}", self.customer.membership)?;
        writeln!(f, "{}", light)?;
        writeln!(f, "ITEMS")?;
        writeln!(f, "{}", light)?;

        for line in &self.lines {
            writeln!(f, "{} ({})", line.name, line.product_id)?;
            writeln!(f, "  Original price: {}", line.original_price)?;
            writeln!(f, "  Discount: {}", as_deduction(line.discount))?;
            writeln!(f, "  Unit price: {} x {}", line.unit_price, line.quantity)?;
            writeln!(f, "  Subtotal: {}", line.line_subtotal)?;
            writeln!(f, "  Tax: {}", line.line_tax)?;
            for detail in &line.details {
                writeln!(f, "  {}", detail)?;
            }
        }

        let summary = &self.summary;
        writeln!(f, "{}", light)?;
        write_amount(f, "Subtotal:", &summary.subtotal.to_string())?;
        write_amount(f, "Tax:", &summary.tax.to_string())?;
        write_amount(
            f,
            &format!("Loyalty discount ({}%):", summary.loyalty_percent.normalize()),
            &as_deduction(summary.loyalty_discount),
        )?;
        write_amount(
            f,
            &format!("Shipping ({}):", summary.shipping_method),
            &summary.shipping.to_string(),
        )?;
        writeln!(f, "{}", light)?;
        write_amount(f, "TOTAL:", &summary.total.to_string())?;
        write!(f, "{}", heavy)
    }
}

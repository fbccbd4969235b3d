//! # Checkout Configuration
//!
//! Policy values for shipping, loyalty and receipts.
//!
//! The defaults ARE the business rules: a `CheckoutConfig::default()` prices
//! every order exactly as documented on `Order` and `Customer`. Loading from
//! files and environment happens in the binary, never in this crate.
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Till Demo Store"
//! order_prefix = "ORD"
//!
//! [shipping]
//! minimum_charge = "5.00"
//! standard_rate = "1"
//! express_rate = "3"
//! next_day_rate = "5"
//!
//! [loyalty]
//! regular_percent = "0"
//! premium_percent = "5"
//! vip_percent = "10"
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{MembershipTier, ShippingMethod};

// =============================================================================
// Shipping Policy
// =============================================================================

/// Cost per unit of weight for each shipping method, plus a floor.
///
/// ## Cost Formula
/// ```text
/// raw  = total_weight × rate(method)
/// cost = max(raw, minimum_charge)
///
/// 4.1 kg Express:  4.1 × 3 = $12.30  (above floor)
/// 1.0 kg Standard: 1.0 × 1 = $1.00 → $5.00 (clamped)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Lowest amount ever charged for shipping.
    #[serde(default = "default_minimum_charge")]
    pub minimum_charge: Money,

    #[serde(default = "default_standard_rate")]
    pub standard_rate: Decimal,

    #[serde(default = "default_express_rate")]
    pub express_rate: Decimal,

    #[serde(default = "default_next_day_rate")]
    pub next_day_rate: Decimal,
}

fn default_minimum_charge() -> Money {
    Money::from_cents(500)
}

fn default_standard_rate() -> Decimal {
    Decimal::ONE
}

fn default_express_rate() -> Decimal {
    Decimal::from(3)
}

fn default_next_day_rate() -> Decimal {
    Decimal::from(5)
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy {
            minimum_charge: default_minimum_charge(),
            standard_rate: default_standard_rate(),
            express_rate: default_express_rate(),
            next_day_rate: default_next_day_rate(),
        }
    }
}

impl ShippingPolicy {
    /// Returns the per-weight-unit rate for a method.
    pub fn rate_for(&self, method: ShippingMethod) -> Decimal {
        match method {
            ShippingMethod::Standard => self.standard_rate,
            ShippingMethod::Express => self.express_rate,
            ShippingMethod::NextDay => self.next_day_rate,
        }
    }

    /// Prices a parcel of `total_weight`, clamped to the minimum charge.
    pub fn cost_for_weight(&self, total_weight: Decimal, method: ShippingMethod) -> Money {
        let raw = Money::new(total_weight * self.rate_for(method));
        raw.max(self.minimum_charge)
    }
}

// =============================================================================
// Loyalty Policy
// =============================================================================

/// Percentage of the cart subtotal taken off per membership tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyPolicy {
    #[serde(default)]
    pub regular_percent: Decimal,

    #[serde(default = "default_premium_percent")]
    pub premium_percent: Decimal,

    #[serde(default = "default_vip_percent")]
    pub vip_percent: Decimal,
}

fn default_premium_percent() -> Decimal {
    Decimal::from(5)
}

fn default_vip_percent() -> Decimal {
    Decimal::TEN
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        LoyaltyPolicy {
            regular_percent: Decimal::ZERO,
            premium_percent: default_premium_percent(),
            vip_percent: default_vip_percent(),
        }
    }
}

impl LoyaltyPolicy {
    /// Returns the discount percentage for a tier.
    pub fn percent_for(&self, tier: MembershipTier) -> Decimal {
        match tier {
            MembershipTier::Regular => self.regular_percent,
            MembershipTier::Premium => self.premium_percent,
            MembershipTier::Vip => self.vip_percent,
        }
    }

    /// Discount amount for `tier` on a pre-tax, pre-shipping subtotal.
    pub fn discount_for(&self, tier: MembershipTier, subtotal: Money) -> Money {
        subtotal.percentage_of(self.percent_for(tier))
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Printed in the receipt header.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    /// Prefix of generated order ids (`ORD-2026-001`).
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,

    #[serde(default)]
    pub shipping: ShippingPolicy,

    #[serde(default)]
    pub loyalty: LoyaltyPolicy,
}

fn default_store_name() -> String {
    "Till Store".to_string()
}

fn default_order_prefix() -> String {
    "ORD".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            store_name: default_store_name(),
            order_prefix: default_order_prefix(),
            shipping: ShippingPolicy::default(),
            loyalty: LoyaltyPolicy::default(),
        }
    }
}

impl CheckoutConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.order_prefix.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "order_prefix must not be empty".into(),
            ));
        }

        if self.shipping.minimum_charge.is_negative() {
            return Err(CoreError::InvalidConfig(
                "shipping.minimum_charge cannot be negative".into(),
            ));
        }

        let rates = [
            ("standard_rate", self.shipping.standard_rate),
            ("express_rate", self.shipping.express_rate),
            ("next_day_rate", self.shipping.next_day_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(CoreError::InvalidConfig(format!(
                    "shipping.{} cannot be negative, got {}",
                    name, rate
                )));
            }
        }

        let percents = [
            ("regular_percent", self.loyalty.regular_percent),
            ("premium_percent", self.loyalty.premium_percent),
            ("vip_percent", self.loyalty.vip_percent),
        ];
        for (name, percent) in percents {
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(CoreError::InvalidConfig(format!(
                    "loyalty.{} must be between 0 and 100, got {}",
                    name, percent
                )));
            }
        }

        Ok(())
    }
}

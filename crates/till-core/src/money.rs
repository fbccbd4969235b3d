//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Checkout chains several multiplications:                               │
//! │    price × (1 - discount) × tax rate × quantity ...                    │
//! │  and every float step adds drift.                                       │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    1200.00 × 0.0825 = 99.0000 exactly                                   │
//! │    Rounding happens once, for display only                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//!
//! let doubled = price * 2;                       // $21.98
//! let total = price + Money::from_cents(500);    // $15.99
//! assert_eq!(total.to_string(), "$15.99");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact base-10 math; negative values show up as
///   discounts on receipts
/// - **No implicit rounding**: tax on $1080.00 at 8.25% is kept as 89.1000
///   until it is displayed
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► Cart.subtotal ──► Customer loyalty discount
///                 │
///                 └──► Product.calculate_tax ──► Cart.total_tax
///
/// Order receipt: subtotal + tax + shipping - loyalty discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount in major units (dollars).
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.amount(), Decimal::new(1099, 2));
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds half away from zero to whole cents.
    ///
    /// Only used for display; calculations keep full precision.
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Calculates tax at the given rate with no intermediate rounding.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::TaxRate;
    ///
    /// let price = Money::from_cents(120_000); // $1200.00
    /// let tax = price.calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax, Money::from_cents(9_900)); // $99.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.as_decimal())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total, Money::from_cents(897)); // $8.97
    /// ```
    ///
    /// Panics if the product does not fit in a `Decimal`; cart lines are
    /// checked with [`Money::checked_multiply_quantity`] when reserved.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let huge = Money::new(Decimal::MAX);
    /// assert!(huge.checked_multiply_quantity(2).is_none());
    /// assert_eq!(
    ///     Money::from_cents(299).checked_multiply_quantity(3),
    ///     Some(Money::from_cents(897))
    /// );
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Returns `percentage`% of this amount.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_cents(10_000); // $100.00
    /// let five_percent = subtotal.percentage_of(Decimal::from(5));
    /// assert_eq!(five_percent, Money::from_cents(500));
    /// ```
    pub fn percentage_of(&self, percentage: Decimal) -> Money {
        Money(self.0 * percentage / Decimal::ONE_HUNDRED)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_cents(120_000); // $1200.00
    /// let discounted = price.apply_percentage_discount(Decimal::TEN);
    /// assert_eq!(discounted, Money::from_cents(108_000)); // $1080.00
    /// ```
    pub fn apply_percentage_discount(&self, percentage: Decimal) -> Money {
        *self - self.percentage_of(percentage)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$1080.00` / `-$5.50`, rounded to cents.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Multiplication by a rate or weight.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(dec!(12.3)).to_string(), "$12.30");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec!(0.825)).to_string(), "$0.83");
        assert_eq!(Money::new(dec!(-0.825)).to_string(), "-$0.83");
        assert_eq!(Money::new(dec!(-0.001)).to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a * 3, Money::from_cents(3000));
        assert_eq!(a * dec!(0.5), Money::from_cents(500));
    }

    #[test]
    fn test_tax_is_exact() {
        let price = Money::new(dec!(1080.00));
        let tax = price.calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.amount(), dec!(89.10));
    }

    #[test]
    fn test_percentage_discount_compounds() {
        let price = Money::new(dec!(100));
        let once = price.apply_percentage_discount(dec!(10));
        let twice = once.apply_percentage_discount(dec!(10));
        assert_eq!(once.amount(), dec!(90));
        assert_eq!(twice.amount(), dec!(81));
    }

    #[test]
    fn test_checked_multiply_quantity_overflow() {
        let price = Money::new(dec!(10000000000.00));
        assert!(price.checked_multiply_quantity(i64::MAX).is_none());
        assert_eq!(
            Money::from_cents(250).checked_multiply_quantity(i64::from(i32::MAX)),
            Some(Money::new(dec!(5368709117.50)))
        );
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 5]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total, Money::from_cents(355));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.30))).unwrap();
        assert_eq!(json, "\"12.30\"");
    }
}

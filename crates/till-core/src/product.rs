//! # Products
//!
//! Catalog items with category-specific tax and discount rules.
//!
//! ## Variant Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind         Tax rate   Discountable   Extra attributes                │
//! │  ──────────   ────────   ────────────   ─────────────────────────────   │
//! │  Electronic    8.25%     yes            warranty_months                 │
//! │  Book          6.00%     yes            author, isbn                    │
//! │  Clothing      7.50%     no             size, color                     │
//! │                                                                         │
//! │  Every kind carries a shipping weight (see HasShippingWeight)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sharing
//! A product is shared between the caller, the cart that reserves it, and
//! any order snapshot through [`ProductRef`]. A price cut made through one
//! handle shows up in every cart total that references it.

use rust_decimal::Decimal;
use serde::Serialize;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Write as _;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::error::{CoreResult, StateError, ValidationError};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{
    validate_count_sum, validate_non_negative, validate_percentage, validate_price,
    validate_required, validate_weight,
};

/// Electronics tax: 8.25%.
pub const ELECTRONIC_TAX_RATE: TaxRate = TaxRate::from_bps(825);

/// Books tax: 6%.
pub const BOOK_TAX_RATE: TaxRate = TaxRate::from_bps(600);

/// Clothing tax: 7.5%.
pub const CLOTHING_TAX_RATE: TaxRate = TaxRate::from_bps(750);

// =============================================================================
// Shipping Weight Capability
// =============================================================================

/// Anything that can be weighed for shipping.
pub trait HasShippingWeight {
    /// Weight of a single unit.
    fn shipping_weight(&self) -> Decimal;
}

// =============================================================================
// Product Kind
// =============================================================================

/// The closed set of product categories and their own attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductKind {
    Electronic { warranty_months: u32 },
    Book { author: String, isbn: String },
    Clothing { size: String, color: String },
}

impl ProductKind {
    /// Tax rate charged for this category.
    pub fn tax_rate(&self) -> TaxRate {
        match self {
            ProductKind::Electronic { .. } => ELECTRONIC_TAX_RATE,
            ProductKind::Book { .. } => BOOK_TAX_RATE,
            ProductKind::Clothing { .. } => CLOTHING_TAX_RATE,
        }
    }

    /// Whether products of this category accept price discounts.
    pub fn is_discountable(&self) -> bool {
        match self {
            ProductKind::Electronic { .. } | ProductKind::Book { .. } => true,
            ProductKind::Clothing { .. } => false,
        }
    }

    /// Human-readable category name.
    pub fn category(&self) -> &'static str {
        match self {
            ProductKind::Electronic { .. } => "Electronic",
            ProductKind::Book { .. } => "Book",
            ProductKind::Clothing { .. } => "Clothing",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// ## Invariants
/// - `price > 0`
/// - `inventory_count >= 0`
/// - `weight >= 0`
///
/// Fields are private so every mutation goes through a validated method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: String,
    name: String,
    description: String,
    price: Money,
    inventory_count: i64,
    is_discountable: bool,
    weight: Decimal,
    kind: ProductKind,
}

impl Product {
    /// Creates a product after validating every argument.
    ///
    /// Discount eligibility follows the kind. Weight starts at zero; use
    /// [`Product::with_weight`] or a kind-specific constructor to set it.
    ///
    /// ## Errors
    /// `ValidationError` when the id or name is blank, the price is not
    /// positive, or the inventory count is negative.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        inventory_count: i64,
        kind: ProductKind,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();

        validate_required("id", &id)?;
        validate_required("name", &name)?;
        validate_price(price.amount())?;
        validate_non_negative("inventory count", inventory_count)?;

        Ok(Product {
            is_discountable: kind.is_discountable(),
            id,
            name,
            description: String::new(),
            price,
            inventory_count,
            weight: Decimal::ZERO,
            kind,
        })
    }

    /// Creates an electronic product (8.25% tax, discountable).
    pub fn electronic(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        inventory_count: i64,
        warranty_months: u32,
        weight: Decimal,
    ) -> CoreResult<Self> {
        Product::new(
            id,
            name,
            price,
            inventory_count,
            ProductKind::Electronic { warranty_months },
        )?
        .with_weight(weight)
    }

    /// Creates a book (6% tax, discountable).
    pub fn book(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        inventory_count: i64,
        author: impl Into<String>,
        isbn: impl Into<String>,
        weight: Decimal,
    ) -> CoreResult<Self> {
        let kind = ProductKind::Book {
            author: author.into(),
            isbn: isbn.into(),
        };
        Product::new(id, name, price, inventory_count, kind)?.with_weight(weight)
    }

    /// Creates a clothing item (7.5% tax, never discounted).
    pub fn clothing(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        inventory_count: i64,
        size: impl Into<String>,
        color: impl Into<String>,
        weight: Decimal,
    ) -> CoreResult<Self> {
        let kind = ProductKind::Clothing {
            size: size.into(),
            color: color.into(),
        };
        Product::new(id, name, price, inventory_count, kind)?.with_weight(weight)
    }

    /// Sets the description while building.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the shipping weight while building.
    pub fn with_weight(mut self, weight: Decimal) -> CoreResult<Self> {
        self.set_weight(weight)?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current unit price, after any discounts applied so far.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn inventory_count(&self) -> i64 {
        self.inventory_count
    }

    pub fn is_discountable(&self) -> bool {
        self.is_discountable
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Mutable access to the kind-specific attributes (author, size, ...).
    ///
    /// The category itself is fixed at construction; replacing the kind with
    /// another category would change tax and discount rules under a live
    /// cart, so only the fields inside the current variant should be edited.
    pub fn kind_mut(&mut self) -> &mut ProductKind {
        &mut self.kind
    }

    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.kind.tax_rate()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Changes the shipping weight.
    pub fn set_weight(&mut self, weight: Decimal) -> CoreResult<()> {
        validate_weight(weight)?;
        self.weight = weight;
        Ok(())
    }

    /// Tax on one unit at the current price.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{Money, Product};
    /// use rust_decimal::Decimal;
    ///
    /// let laptop = Product::electronic("E001", "Laptop", Money::from_cents(120_000), 5, 24, Decimal::new(25, 1)).unwrap();
    /// assert_eq!(laptop.calculate_tax(), Money::from_cents(9_900));
    /// ```
    pub fn calculate_tax(&self) -> Money {
        self.price.calculate_tax(self.tax_rate())
    }

    /// Permanently cuts the price by `percentage`% and returns the new price.
    ///
    /// Repeated calls compound: two 10% discounts leave 81% of the original.
    ///
    /// ## Errors
    /// - `StateError::NotDiscountable` for clothing
    /// - `ValidationError::OutOfRange` when `percentage` is outside 0..=100
    /// - `ValidationError::MustBePositive` when the cut would leave a zero price
    pub fn apply_discount(&mut self, percentage: Decimal) -> CoreResult<Money> {
        if !self.is_discountable {
            warn!(product_id = %self.id, "Discount rejected for non-discountable product");
            return Err(StateError::NotDiscountable {
                product_id: self.id.clone(),
            }
            .into());
        }

        validate_percentage(percentage)?;

        let discounted = self.price.apply_percentage_discount(percentage);
        if !discounted.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "discounted price".to_string(),
            }
            .into());
        }

        debug!(
            product_id = %self.id,
            percentage = %percentage,
            old_price = %self.price,
            new_price = %discounted,
            "Applying discount"
        );
        self.price = discounted;
        Ok(discounted)
    }

    /// Removes `qty` units from stock.
    ///
    /// ## Errors
    /// - `ValidationError` when `qty` is negative
    /// - `StateError::InsufficientStock` when `qty` exceeds the stock on hand
    pub fn decrease_inventory(&mut self, qty: i64) -> CoreResult<()> {
        validate_non_negative("quantity", qty)?;

        if qty > self.inventory_count {
            return Err(StateError::InsufficientStock {
                product_id: self.id.clone(),
                available: self.inventory_count,
                requested: qty,
            }
            .into());
        }

        self.inventory_count -= qty;
        debug!(product_id = %self.id, delta = -qty, stock = self.inventory_count, "Inventory decreased");
        Ok(())
    }

    /// Returns `qty` units to stock.
    ///
    /// ## Errors
    /// - `ValidationError` when `qty` is negative
    /// - `ValidationError::OutOfRange` when the new count would overflow
    pub fn increase_inventory(&mut self, qty: i64) -> CoreResult<()> {
        validate_non_negative("quantity", qty)?;

        self.inventory_count = validate_count_sum("inventory_count", self.inventory_count, qty)?;
        debug!(product_id = %self.id, delta = qty, stock = self.inventory_count, "Inventory increased");
        Ok(())
    }

    /// Multi-line description of the product and its category attributes.
    pub fn details(&self) -> String {
        let mut out = format!(
            "{} (ID: {})\nCategory: {}\nPrice: {}\nIn stock: {}",
            self.name,
            self.id,
            self.category(),
            self.price,
            self.inventory_count
        );
        if !self.description.is_empty() {
            let _ = write!(out, "\nDescription: {}", self.description);
        }

        match &self.kind {
            ProductKind::Electronic { warranty_months } => {
                let _ = write!(out, "\nWarranty: {} months", warranty_months);
            }
            ProductKind::Book { author, isbn } => {
                let _ = write!(out, "\nAuthor: {}\nISBN: {}", author, isbn);
            }
            ProductKind::Clothing { size, color } => {
                let _ = write!(out, "\nSize: {}\nColor: {}", size, color);
            }
        }
        let _ = write!(out, "\nWeight: {} kg", self.weight.normalize());
        out
    }
}

impl HasShippingWeight for Product {
    fn shipping_weight(&self) -> Decimal {
        self.weight
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Shared, mutable handle to a [`Product`].
///
/// Identity is the handle allocation, not the product id: two handles made
/// from separate `ProductRef::new` calls are different cart entries even if
/// their ids match, while clones of one handle are the same entry.
#[derive(Debug, Clone)]
pub struct ProductRef(Rc<RefCell<Product>>);

impl ProductRef {
    pub fn new(product: Product) -> Self {
        ProductRef(Rc::new(RefCell::new(product)))
    }

    /// Read access to the product.
    pub fn borrow(&self) -> Ref<'_, Product> {
        self.0.borrow()
    }

    /// Write access to the product.
    pub fn borrow_mut(&self) -> RefMut<'_, Product> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same product instance.
    pub fn same_product(&self, other: &ProductRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn id(&self) -> String {
        self.0.borrow().id.clone()
    }
}

impl From<Product> for ProductRef {
    fn from(product: Product) -> Self {
        ProductRef::new(product)
    }
}

impl HasShippingWeight for ProductRef {
    fn shipping_weight(&self) -> Decimal {
        self.0.borrow().shipping_weight()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use rust_decimal_macros::dec;

    fn laptop() -> Product {
        Product::electronic("E001", "Laptop", Money::new(dec!(1200.00)), 10, 24, dec!(2.5))
            .unwrap()
    }

    fn tshirt() -> Product {
        Product::clothing("C001", "T-Shirt", Money::new(dec!(19.99)), 50, "M", "Blue", dec!(0.2))
            .unwrap()
    }

    #[test]
    fn test_constructor_validation() {
        let price = Money::new(dec!(10));
        let kind = ProductKind::Electronic { warranty_months: 12 };

        let err = Product::new("", "Radio", price, 1, kind.clone()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert!(Product::new("E9", "  ", price, 1, kind.clone()).is_err());
        assert!(Product::new("E9", "Radio", Money::zero(), 1, kind.clone()).is_err());
        assert!(Product::new("E9", "Radio", Money::new(dec!(-1)), 1, kind.clone()).is_err());
        assert!(Product::new("E9", "Radio", price, -1, kind.clone()).is_err());
        assert!(Product::new("E9", "Radio", price, 0, kind).is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = Product::book("B1", "Novel", Money::new(dec!(9)), 1, "A", "I", dec!(-0.1));
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_discountable_by_kind() {
        assert!(laptop().is_discountable());
        assert!(!tshirt().is_discountable());
        let book = Product::book("B1", "Novel", Money::new(dec!(9)), 1, "A", "I", dec!(0.8)).unwrap();
        assert!(book.is_discountable());
    }

    #[test]
    fn test_tax_per_category() {
        assert_eq!(laptop().calculate_tax().amount(), dec!(99.00));

        let book = Product::book("B1", "Novel", Money::new(dec!(20)), 1, "A", "I", dec!(0.8)).unwrap();
        assert_eq!(book.calculate_tax().amount(), dec!(1.20));

        assert_eq!(tshirt().calculate_tax().amount(), dec!(1.49925));
    }

    #[test]
    fn test_discount_then_tax() {
        let mut product = laptop();
        let new_price = product.apply_discount(dec!(10)).unwrap();

        assert_eq!(new_price.amount(), dec!(1080.00));
        assert_eq!(product.price().amount(), dec!(1080.00));
        assert_eq!(product.calculate_tax().amount(), dec!(89.10));
    }

    #[test]
    fn test_discount_compounds() {
        let mut product = laptop();
        product.apply_discount(dec!(10)).unwrap();
        product.apply_discount(dec!(10)).unwrap();
        assert_eq!(product.price().amount(), dec!(972.00));
    }

    #[test]
    fn test_discount_on_clothing_fails_and_keeps_price() {
        let mut product = tshirt();
        let err = product.apply_discount(dec!(10)).unwrap_err();

        assert!(matches!(err, CoreError::State(StateError::NotDiscountable { .. })));
        assert_eq!(product.price().amount(), dec!(19.99));
    }

    #[test]
    fn test_discount_percentage_range() {
        let mut product = laptop();
        assert!(product.apply_discount(dec!(-1)).unwrap_err().is_validation());
        assert!(product.apply_discount(dec!(101)).unwrap_err().is_validation());
        assert!(product.apply_discount(dec!(100)).unwrap_err().is_validation());
        assert_eq!(product.price().amount(), dec!(1200.00));

        assert_eq!(product.apply_discount(dec!(0)).unwrap().amount(), dec!(1200.00));
    }

    #[test]
    fn test_inventory_round_trip() {
        let mut product = laptop();
        product.decrease_inventory(4).unwrap();
        assert_eq!(product.inventory_count(), 6);
        product.increase_inventory(4).unwrap();
        assert_eq!(product.inventory_count(), 10);
    }

    #[test]
    fn test_inventory_errors() {
        let mut product = laptop();

        let err = product.decrease_inventory(11).unwrap_err();
        assert!(matches!(
            err,
            CoreError::State(StateError::InsufficientStock { available: 10, requested: 11, .. })
        ));
        assert!(product.decrease_inventory(-1).unwrap_err().is_validation());
        assert!(product.increase_inventory(-1).unwrap_err().is_validation());
        assert_eq!(product.inventory_count(), 10);

        product.decrease_inventory(10).unwrap();
        assert_eq!(product.inventory_count(), 0);
    }

    #[test]
    fn test_increase_inventory_overflow_is_rejected() {
        let mut product = laptop();

        let err = product.increase_inventory(i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "inventory_count"
        ));
        assert_eq!(product.inventory_count(), 10);

        product.increase_inventory(i64::MAX - 10).unwrap();
        assert_eq!(product.inventory_count(), i64::MAX);
    }

    #[test]
    fn test_details_per_kind() {
        let details = laptop().with_description("14 inch").details();
        assert!(details.starts_with("Laptop (ID: E001)"));
        assert!(details.contains("Price: $1200.00"));
        assert!(details.contains("Description: 14 inch"));
        assert!(details.contains("Warranty: 24 months"));
        assert!(details.contains("Weight: 2.5 kg"));

        let book = Product::book("B1", "Rust", Money::new(dec!(45)), 3, "Steve", "978-1", dec!(0.8))
            .unwrap();
        let details = book.details();
        assert!(details.contains("Author: Steve"));
        assert!(details.contains("ISBN: 978-1"));

        let details = tshirt().details();
        assert!(details.contains("Size: M"));
        assert!(details.contains("Color: Blue"));
        assert!(!details.contains("Description"));
    }

    #[test]
    fn test_kind_attributes_are_mutable() {
        let mut product = tshirt();
        if let ProductKind::Clothing { size, .. } = product.kind_mut() {
            *size = "L".to_string();
        }
        assert!(product.details().contains("Size: L"));
        product.set_description("Cotton");
        assert_eq!(product.description(), "Cotton");
    }

    #[test]
    fn test_product_ref_identity() {
        let a = ProductRef::new(laptop());
        let a_clone = a.clone();
        let b = ProductRef::new(laptop());

        assert!(a.same_product(&a_clone));
        assert!(!a.same_product(&b));

        a.borrow_mut().decrease_inventory(1).unwrap();
        assert_eq!(a_clone.borrow().inventory_count(), 9);
        assert_eq!(b.borrow().inventory_count(), 10);
        assert_eq!(a.shipping_weight(), dec!(2.5));
    }
}

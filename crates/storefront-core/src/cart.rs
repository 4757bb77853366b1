//! # Cart
//!
//! The storefront shopping cart: named line items with a unit price and a
//! quantity. The cart only produces a subtotal; tax is the resolver's job.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(name, price, qty) ──► merge into existing line or push       │
//! │  update_quantity(name, qty) ──► set qty (0 removes the line)           │
//! │  remove_item(name)          ──► drop the line                          │
//! │  clear()                    ──► empty cart                             │
//! │                                                                         │
//! │  subtotal() = Σ unit_price × quantity                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_cart_size, validate_item_name, validate_price_cents, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A line in the cart.
///
/// The unit price is frozen when the line is first added; adding the same
/// name again only increases the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartItem {
    /// Unit price × quantity, saturating at the `i64` bounds.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `name`
/// - Every quantity is between 1 and `MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds an item or increases its quantity if a line with that name exists.
    ///
    /// ```rust
    /// use storefront_core::cart::Cart;
    /// use storefront_core::money::Money;
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item("Todo App Pro License", Money::from_cents(2999), 1).unwrap();
    /// cart.add_item("Premium Support", Money::from_cents(1999), 1).unwrap();
    /// assert_eq!(cart.subtotal().to_decimal_string(), "49.98");
    /// ```
    pub fn add_item(&mut self, name: &str, unit_price: Money, quantity: i64) -> CoreResult<()> {
        validate_item_name(name)?;
        validate_price_cents(unit_price.cents())?;
        validate_quantity(quantity)?;
        let name = name.trim();

        if let Some(item) = self.items.iter_mut().find(|i| i.name == name) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        self.items.push(CartItem {
            name: name.to_string(),
            unit_price,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of a line. A quantity of 0 removes it.
    pub fn update_quantity(&mut self, name: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(name);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| CoreError::ItemNotFound(name.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, name: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.name != name);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotFound(name.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Pre-tax amount.
    ///
    /// Exact for carts built through `add_item`. A deserialized cart that
    /// bypassed validation saturates at the `i64` bounds.
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Money::zero(), Money::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn demo_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item("Todo App Pro License", Money::from_cents(2999), 1).unwrap();
        cart.add_item("Premium Support", Money::from_cents(1999), 1).unwrap();
        cart
    }

    #[test]
    fn test_cart_add_item() {
        let cart = demo_cart();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 4998);
    }

    #[test]
    fn test_cart_add_same_item_increases_quantity() {
        let mut cart = demo_cart();
        cart.add_item("Premium Support", Money::from_cents(1999), 2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.subtotal().cents(), 2999 + 3 * 1999);
    }

    #[test]
    fn test_cart_merges_on_trimmed_name() {
        let mut cart = demo_cart();
        cart.add_item("  Premium Support ", Money::from_cents(1999), 1).unwrap();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_cart_rejects_invalid_input() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item("", Money::from_cents(100), 1),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(cart.add_item("Refund", Money::from_cents(-100), 1).is_err());
        assert!(cart.add_item("Widget", Money::from_cents(100), 0).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_quantity_limit() {
        let mut cart = Cart::new();
        cart.add_item("Widget", Money::from_cents(100), MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add_item("Widget", Money::from_cents(100), 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            cart.update_quantity("Widget", MAX_ITEM_QUANTITY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(&format!("Item {}", i), Money::from_cents(100), 1).unwrap();
        }
        assert!(matches!(
            cart.add_item("One too many", Money::from_cents(100), 1),
            Err(CoreError::CartTooLarge { .. })
        ));
        // Existing lines can still grow
        cart.add_item("Item 0", Money::from_cents(100), 1).unwrap();
    }

    #[test]
    fn test_cart_rejects_price_above_cap() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item("A", Money::from_cents(i64::MAX), 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(matches!(
            cart.add_item("A", Money::from_cents(crate::MAX_UNIT_PRICE_CENTS + 1), 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        cart.add_item("B", Money::parse("1.00").unwrap(), 1).unwrap();
        assert_eq!(cart.subtotal().cents(), 100);
    }

    #[test]
    fn test_full_cart_at_max_price_does_not_overflow() {
        let price = Money::from_cents(crate::MAX_UNIT_PRICE_CENTS);
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(&format!("Item {}", i), price, MAX_ITEM_QUANTITY).unwrap();
        }
        let expected = crate::MAX_UNIT_PRICE_CENTS * MAX_ITEM_QUANTITY * MAX_CART_ITEMS as i64;
        assert_eq!(cart.subtotal().cents(), expected);
    }

    #[test]
    fn test_deserialized_cart_subtotal_saturates() {
        let json = format!(
            r#"{{ "items": [
                {{ "name": "A", "unitPrice": {}, "quantity": 1 }},
                {{ "name": "B", "unitPrice": 100, "quantity": 1 }}
            ] }}"#,
            i64::MAX
        );
        let cart: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart.subtotal().cents(), i64::MAX);
    }

    #[test]
    fn test_cart_update_and_remove() {
        let mut cart = demo_cart();

        cart.update_quantity("Premium Support", 3).unwrap();
        assert_eq!(cart.total_quantity(), 4);

        cart.update_quantity("Premium Support", 0).unwrap();
        assert_eq!(cart.item_count(), 1);

        assert!(matches!(
            cart.remove_item("Premium Support"),
            Err(CoreError::ItemNotFound(_))
        ));
        assert!(cart.update_quantity("Missing", 2).is_err());
        assert!(cart.update_quantity("Todo App Pro License", -1).is_err());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = demo_cart();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_cart_serializes_camel_case() {
        let json = serde_json::to_value(demo_cart()).unwrap();
        assert_eq!(json["items"][0]["unitPrice"], 2999);
        assert_eq!(json["items"][1]["name"], "Premium Support");
    }
}

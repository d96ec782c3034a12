//! Session cart model.
//!
//! The cart is pure state with explicit mutation entry points (`add`,
//! `remove`, `set_quantity`) and derived totals. It is serialized into the
//! session record, so it survives page reloads for the session lifetime but
//! is not an order history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shopreel_core::{CurrencyCode, Price, ProductId};

use crate::models::product::ProductSnapshot;

/// One product in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product at add-to-cart time.
    pub product: ProductSnapshot,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn total(&self) -> Price {
        Price::from_stored(
            self.product.unit_price.amount * Decimal::from(self.quantity),
            self.product.unit_price.currency_code,
        )
    }
}

/// The session cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add a product to the cart, incrementing the quantity if it is
    /// already present.
    pub fn add(&mut self, product: ProductSnapshot) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product,
                quantity: 1,
            });
        }
    }

    /// Remove a product from the cart. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    /// Set the quantity for a product already in the cart.
    ///
    /// Non-positive quantities coerce to 1; a quantity of zero does not
    /// remove the line (that is what [`Cart::remove`] is for).
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity.max(1)).unwrap_or(1);
        true
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of items (sum of quantities).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .lines
            .first()
            .map_or(CurrencyCode::USD, |l| l.product.unit_price.currency_code);
        let amount = self
            .lines
            .iter()
            .map(|l| l.total().amount)
            .sum::<Decimal>();
        Price::from_stored(amount, currency)
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Normalize a client-supplied quantity to a positive integer.
///
/// Quantity inputs arrive as whatever the client's form produced: a number,
/// a numeric string, an empty string, or nothing at all. Anything that is
/// not a positive integer coerces to 1.
#[must_use]
pub fn normalize_quantity(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.filter(|q| *q >= 1).unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(name: &str, price: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::generate(),
            name: name.to_string(),
            unit_price: Price::parse_usd(price).unwrap(),
            media_url: format!("https://example.com/{name}.jpg"),
            creator_name: "Ava".to_string(),
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::default();
        cart.add(snapshot("shirt", "19.99"));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().display(), "$19.99");
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = Cart::default();
        let item = snapshot("shirt", "19.99");
        cart.add(item.clone());
        cart.add(item);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().display(), "$39.98");
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::default();
        let item = snapshot("shirt", "19.99");
        let id = item.id;
        cart.add(item);
        cart.remove(id);
        assert!(cart.is_empty());

        // Removing again is a no-op
        cart.remove(id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::default();
        let item = snapshot("shirt", "10.00");
        let id = item.id;
        cart.add(item);

        assert!(cart.set_quantity(id, 3));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal().display(), "$30.00");
    }

    #[test]
    fn test_set_quantity_coerces_non_positive_to_one() {
        let mut cart = Cart::default();
        let item = snapshot("shirt", "10.00");
        let id = item.id;
        cart.add(item);
        assert!(cart.set_quantity(id, 5));

        assert!(cart.set_quantity(id, 0));
        assert_eq!(cart.item_count(), 1);

        assert!(cart.set_quantity(id, -4));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_missing_product() {
        let mut cart = Cart::default();
        assert!(!cart.set_quantity(ProductId::generate(), 2));
    }

    #[test]
    fn test_subtotal_across_lines() {
        let mut cart = Cart::default();
        cart.add(snapshot("shirt", "19.99"));
        cart.add(snapshot("shoes", "45.50"));
        assert_eq!(cart.subtotal().display(), "$65.49");
    }

    #[test]
    fn test_empty_cart_subtotal() {
        let cart = Cart::default();
        assert_eq!(cart.subtotal().display(), "$0.00");
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_normalize_quantity_strings() {
        assert_eq!(normalize_quantity(Some(&json!("3"))), 3);
        assert_eq!(normalize_quantity(Some(&json!("0"))), 1);
        assert_eq!(normalize_quantity(Some(&json!(""))), 1);
        assert_eq!(normalize_quantity(Some(&json!("  7 "))), 7);
        assert_eq!(normalize_quantity(Some(&json!("abc"))), 1);
    }

    #[test]
    fn test_normalize_quantity_numbers() {
        assert_eq!(normalize_quantity(Some(&json!(4))), 4);
        assert_eq!(normalize_quantity(Some(&json!(0))), 1);
        assert_eq!(normalize_quantity(Some(&json!(-2))), 1);
        assert_eq!(normalize_quantity(None), 1);
        assert_eq!(normalize_quantity(Some(&Value::Null)), 1);
    }
}

//! # Domain Types
//!
//! Core domain types shared by the cart engine, the catalog views and the
//! client crate.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    CartLine     │   │ CheckoutRequest │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  item_id        │──►│  items[]        │       │
//! │  │  name           │   │  name (frozen)  │   │   item_id       │       │
//! │  │  available_qty  │   │  quantity       │   │   quantity      │       │
//! │  │  batch_number   │   │  unit_price     │   │   unit_price    │       │
//! │  │  expiry_date    │   │  available_qty  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │   (owned by the API)    (owned by the Cart)   (built at checkout)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog Item
// =============================================================================

/// A sellable medicine as reported by the Catalog Provider.
///
/// Read-only: the cart never writes back to it. Each catalog fetch is a fresh
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    /// Server-assigned identifier.
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Current stock on hand.
    pub available_quantity: i64,

    /// Supplier batch number, searched by the inventory view.
    #[serde(default)]
    pub batch_number: Option<String>,

    /// Expiry date of the batch, used by the dashboard stats.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl CatalogItem {
    /// Creates a catalog item with no batch or expiry details.
    pub fn new(id: impl Into<String>, name: impl Into<String>, available_quantity: i64) -> Self {
        CatalogItem {
            id: id.into(),
            name: name.into(),
            available_quantity,
            batch_number: None,
            expiry_date: None,
        }
    }

    /// Checks if at least one unit can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.available_quantity > 0
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One catalog item's entry in the cart.
///
/// Uses the snapshot pattern: `name` and `available_quantity` are frozen
/// from the catalog item at the last successful mutation, so the line keeps
/// rendering consistently while the catalog is refetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Catalog item this line sells.
    pub item_id: String,

    /// Name at time of adding (frozen).
    pub name: String,

    /// Units in the cart, always `1..=available_quantity`.
    pub quantity: i64,

    /// Operator-entered selling price per unit; zero until set.
    pub unit_price: Money,

    /// Stock observed when this line was last changed; the quantity bound.
    pub available_quantity: i64,
}

impl CartLine {
    /// Starts a new line for a catalog item: one unit at price zero.
    pub fn from_catalog_item(item: &CatalogItem) -> Self {
        CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: 1,
            unit_price: Money::zero(),
            available_quantity: item.available_quantity,
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// A single sold line inside a [`CheckoutRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutItem {
    pub item_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl From<&CartLine> for CheckoutItem {
    fn from(line: &CartLine) -> Self {
        CheckoutItem {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// The sale submitted to the Checkout Service, lines in cart order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    /// Sum of `quantity × unit_price` over the request.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .map(|item| item.unit_price.multiply_quantity(item.quantity))
            .sum()
    }

    /// Total number of units sold.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_from_catalog_item() {
        let item = CatalogItem::new("M1", "Paracetamol", 5);
        let line = CartLine::from_catalog_item(&item);

        assert_eq!(line.item_id, "M1");
        assert_eq!(line.name, "Paracetamol");
        assert_eq!(line.quantity, 1);
        assert!(line.unit_price.is_zero());
        assert_eq!(line.available_quantity, 5);
    }

    #[test]
    fn test_line_total() {
        let mut line = CartLine::from_catalog_item(&CatalogItem::new("M1", "Paracetamol", 5));
        line.quantity = 3;
        line.unit_price = Money::from_cents(1250);
        assert_eq!(line.line_total().cents(), 3750);
    }

    #[test]
    fn test_checkout_request_totals() {
        let request = CheckoutRequest {
            items: vec![
                CheckoutItem {
                    item_id: "A".into(),
                    quantity: 2,
                    unit_price: Money::from_major(50),
                },
                CheckoutItem {
                    item_id: "B".into(),
                    quantity: 1,
                    unit_price: Money::from_major(30),
                },
            ],
        };
        assert_eq!(request.total(), Money::from_major(130));
        assert_eq!(request.total_quantity(), 3);
    }

    #[test]
    fn test_catalog_item_serde_shape() {
        let json = r#"{"id":"M1","name":"Paracetamol","availableQuantity":5,"expiryDate":"2027-01-31"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.available_quantity, 5);
        assert_eq!(item.batch_number, None);
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2027, 1, 31));
        assert!(item.in_stock());
    }
}

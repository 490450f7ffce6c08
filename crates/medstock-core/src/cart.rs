//! # Cart Engine
//!
//! The in-progress sale on the billing screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Frontend Action          Cart Method              State Change         │
//! │  ───────────────          ───────────              ────────────         │
//! │                                                                         │
//! │  Click medicine ─────────► add_item() ───────────► push / qty + 1      │
//! │                                                                         │
//! │  Click "+" / "-" ────────► increment()/decrement() qty ± 1 (bounded)   │
//! │                                                                         │
//! │  Type quantity ──────────► set_quantity() ───────► qty = n (clamped)   │
//! │                                                                         │
//! │  Type price ─────────────► set_unit_price() ─────► unit_price = p      │
//! │                                                                         │
//! │  Click trash ────────────► remove_item() ────────► retain(!= id)       │
//! │                                                                         │
//! │  Complete Sale ──────────► to_checkout_request() ► (read only)         │
//! │                                                                         │
//! │  Sale OK / Cancel ───────► reset() ──────────────► lines.clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Refusals
//! Mutations never fail with `Err`. They report a [`CartOutcome`] and leave
//! the cart untouched when they refuse, so a double-clicked button or a
//! stale id is harmless.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartLine, CatalogItem, CheckoutItem, CheckoutRequest};
use crate::validation::{validate_price, validate_quantity};

// =============================================================================
// Cart Outcome
// =============================================================================

/// What a cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// The cart changed as requested (possibly clamped to stock).
    Applied,

    /// Refused: the line would hold more units than are in stock.
    StockExceeded { item_id: String, available: i64 },

    /// Refused: the input itself is invalid (quantity < 1, negative price).
    Rejected(ValidationError),

    /// The id has no line in the cart; nothing to do.
    NotInCart,
}

impl CartOutcome {
    /// Returns true if the cart was changed.
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, CartOutcome::Applied)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart for one billing session.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item increases quantity)
/// - Every line has `1 <= quantity <= available_quantity`
/// - Lines keep insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a catalog item.
    ///
    /// ## Behavior
    /// - Item already in cart: quantity + 1, refreshing the line's known
    ///   stock from `item`
    /// - Item not in cart: new line with quantity 1 and price 0
    /// - Either way, refused with `StockExceeded` if the resulting quantity
    ///   would exceed `item.available_quantity`
    ///
    /// ## User Workflow
    /// ```text
    /// Paracetamol (stock 5) clicked seven times
    ///      │
    ///      ▼
    /// qty: 1 → 2 → 3 → 4 → 5 → 5 (StockExceeded) → 5 (StockExceeded)
    /// ```
    pub fn add_item(&mut self, item: &CatalogItem) -> CartOutcome {
        let current = self.line(&item.id).map_or(0, |line| line.quantity);
        let requested = current + 1;

        if requested > item.available_quantity {
            return CartOutcome::StockExceeded {
                item_id: item.id.clone(),
                available: item.available_quantity,
            };
        }

        let unit_price = self.line(&item.id).map_or(Money::zero(), |line| line.unit_price);
        if self.total_with(&item.id, requested, unit_price).is_none() {
            return total_out_of_range();
        }

        match self.line_mut(&item.id) {
            Some(line) => {
                line.quantity = requested;
                line.available_quantity = item.available_quantity;
            }
            None => self.lines.push(CartLine::from_catalog_item(item)),
        }

        CartOutcome::Applied
    }

    /// Replaces the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity < 1`: rejected, line unchanged
    /// - `quantity` above the line's known stock: clamped to that stock
    /// - Resulting total does not fit in `Money`: rejected
    /// - Unknown id: `NotInCart`
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> CartOutcome {
        if let Err(e) = validate_quantity(quantity) {
            return CartOutcome::Rejected(e);
        }

        let Some(line) = self.line(item_id) else {
            return CartOutcome::NotInCart;
        };
        let quantity = quantity.min(line.available_quantity).max(1);

        if self.total_with(item_id, quantity, line.unit_price).is_none() {
            return total_out_of_range();
        }

        if let Some(line) = self.line_mut(item_id) {
            line.quantity = quantity;
        }
        CartOutcome::Applied
    }

    /// The "+" control: one more unit, bounded by the line's known stock.
    pub fn increment(&mut self, item_id: &str) -> CartOutcome {
        let Some(line) = self.line(item_id) else {
            return CartOutcome::NotInCart;
        };

        if line.quantity + 1 > line.available_quantity {
            return CartOutcome::StockExceeded {
                item_id: line.item_id.clone(),
                available: line.available_quantity,
            };
        }

        if self.total_with(item_id, line.quantity + 1, line.unit_price).is_none() {
            return total_out_of_range();
        }

        if let Some(line) = self.line_mut(item_id) {
            line.quantity += 1;
        }
        CartOutcome::Applied
    }

    /// The "-" control: one fewer unit. Refused at 1; use
    /// [`Cart::remove_item`] to drop the line.
    pub fn decrement(&mut self, item_id: &str) -> CartOutcome {
        let Some(line) = self.line_mut(item_id) else {
            return CartOutcome::NotInCart;
        };

        if let Err(e) = validate_quantity(line.quantity - 1) {
            return CartOutcome::Rejected(e);
        }

        line.quantity -= 1;
        CartOutcome::Applied
    }

    /// Sets the selling price of a line. Negative prices, and prices that
    /// would push the total past what `Money` holds, are rejected.
    pub fn set_unit_price(&mut self, item_id: &str, price: Money) -> CartOutcome {
        if let Err(e) = validate_price(price) {
            return CartOutcome::Rejected(e);
        }

        let Some(line) = self.line(item_id) else {
            return CartOutcome::NotInCart;
        };

        if self.total_with(item_id, line.quantity, price).is_none() {
            return total_out_of_range();
        }

        if let Some(line) = self.line_mut(item_id) {
            line.unit_price = price;
        }
        CartOutcome::Applied
    }

    /// Removes a line. Removing an absent item is a no-op.
    pub fn remove_item(&mut self, item_id: &str) -> CartOutcome {
        let initial_len = self.lines.len();
        self.lines.retain(|line| line.item_id != item_id);

        if self.lines.len() == initial_len {
            CartOutcome::NotInCart
        } else {
            CartOutcome::Applied
        }
    }

    /// Clears all lines (after a successful sale or on cancel).
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Sum of `quantity × unit_price` over all lines.
    pub fn compute_total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Builds the request for the Checkout Service.
    ///
    /// Does not clear the cart: that happens only once the sale is confirmed.
    ///
    /// ## Errors
    /// `CoreError::EmptyCart` if there are no lines.
    pub fn to_checkout_request(&self) -> CoreResult<CheckoutRequest> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(CheckoutRequest {
            items: self.lines.iter().map(CheckoutItem::from).collect(),
        })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up the line for an item.
    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    fn line_mut(&mut self, item_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }

    /// Cart total if the line for `item_id` held `quantity` units at
    /// `unit_price` (appended if absent). `None` if any line total or the
    /// sum does not fit in [`Money`].
    fn total_with(&self, item_id: &str, quantity: i64, unit_price: Money) -> Option<Money> {
        let mut found = false;
        let mut total = Money::zero();

        for line in &self.lines {
            let line_total = if line.item_id == item_id {
                found = true;
                unit_price.checked_mul_quantity(quantity)?
            } else {
                line.unit_price.checked_mul_quantity(line.quantity)?
            };
            total = total.checked_add(line_total)?;
        }

        if !found {
            total = total.checked_add(unit_price.checked_mul_quantity(quantity)?)?;
        }

        Some(total)
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Summary figures for the cart footer.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Everything the presentation layer needs to re-render the cart panel.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(self)
    }
}

fn total_out_of_range() -> CartOutcome {
    CartOutcome::Rejected(ValidationError::OutOfRange {
        field: "total".to_string(),
        min: 0,
        max: i64::MAX,
    })
}

// =============================================================================
// Presentation Snapshots
// =============================================================================

/// Cart totals summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total: cart.compute_total(),
        }
    }
}

/// Read-only copy of the cart handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            lines: cart.lines.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

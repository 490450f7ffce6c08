//! # Catalog Views
//!
//! Stateless projections over a catalog snapshot. None of these touch the
//! cart; they decide what the billing screen offers and what the inventory
//! and dashboard screens show.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog snapshot (Vec<CatalogItem>)                                    │
//! │        │                                                                │
//! │        ├──► filter_addable()    name match AND stock > 0  (billing)     │
//! │        ├──► search_inventory()  name OR batch match       (inventory)   │
//! │        └──► InventoryStats      counts                    (dashboard)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::CatalogItem;

/// Stock level below which an item counts as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Days ahead of today that count as "expiring soon".
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Items the cashier can add to the cart.
///
/// Keeps, in catalog order, every item whose name contains `term`
/// (case-insensitive) and that has stock. An empty term keeps every
/// in-stock item.
///
/// ## Example
/// ```rust
/// use medstock_core::catalog::filter_addable;
/// use medstock_core::CatalogItem;
///
/// let catalog = vec![
///     CatalogItem::new("1", "Paracetamol", 5),
///     CatalogItem::new("2", "Ibuprofen", 0),
/// ];
/// let names: Vec<_> = filter_addable(&catalog, "").iter().map(|m| m.name.as_str()).collect();
/// assert_eq!(names, ["Paracetamol"]);
/// ```
pub fn filter_addable<'a>(catalog: &'a [CatalogItem], term: &str) -> Vec<&'a CatalogItem> {
    let needle = term.to_lowercase();
    catalog
        .iter()
        .filter(|item| contains_ignore_case(&item.name, &needle) && item.in_stock())
        .collect()
}

/// Inventory list search: name or batch number, stock not considered.
pub fn search_inventory<'a>(catalog: &'a [CatalogItem], term: &str) -> Vec<&'a CatalogItem> {
    let needle = term.to_lowercase();
    catalog
        .iter()
        .filter(|item| {
            contains_ignore_case(&item.name, &needle)
                || item
                    .batch_number
                    .as_deref()
                    .is_some_and(|batch| contains_ignore_case(batch, &needle))
        })
        .collect()
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Thresholds behind the dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockPolicy {
    /// Items with fewer units than this are "low stock".
    pub low_stock_threshold: i64,
    /// Items expiring within this many days of today are "expiring soon".
    pub expiry_window_days: i64,
}

impl Default for StockPolicy {
    fn default() -> Self {
        StockPolicy {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
        }
    }
}

/// Dashboard figures for a catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryStats {
    /// Distinct catalog entries.
    pub total_items: usize,
    /// Entries with `available_quantity < low_stock_threshold` (includes
    /// out-of-stock entries).
    pub low_stock: usize,
    /// Entries with no stock at all.
    pub out_of_stock: usize,
    /// Entries whose expiry date falls in `[today, today + window]`.
    pub expiring_soon: usize,
    /// Entries already past their expiry date.
    pub expired: usize,
}

impl InventoryStats {
    /// Computes the stats as of `today`.
    ///
    /// `today` is a parameter so the computation stays pure; callers pass
    /// the local date.
    pub fn compute(catalog: &[CatalogItem], today: NaiveDate, policy: StockPolicy) -> Self {
        let horizon = Duration::try_days(policy.expiry_window_days)
            .and_then(|window| today.checked_add_signed(window))
            .unwrap_or(NaiveDate::MAX);

        catalog.iter().fold(InventoryStats::default(), |mut stats, item| {
            stats.total_items += 1;
            if item.available_quantity < policy.low_stock_threshold {
                stats.low_stock += 1;
            }
            if !item.in_stock() {
                stats.out_of_stock += 1;
            }
            match item.expiry_date {
                Some(expiry) if expiry < today => stats.expired += 1,
                Some(expiry) if expiry <= horizon => stats.expiring_soon += 1,
                _ => {}
            }
            stats
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

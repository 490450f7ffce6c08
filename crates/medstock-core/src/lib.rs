//! # medstock-core: Pure Billing Logic
//!
//! The cart engine behind the pharmacy billing screen, plus the catalog views
//! and money type it relies on. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MedStock Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation Layer (TypeScript)                    │   │
//! │  │    Product grid ──► Cart panel ──► "Complete Sale"              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartSnapshot / actions                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           medstock-client (BillingSession, REST API)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medstock-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  catalog  │  │   money   │  │ validation│  │   │
//! │  │   │   Cart    │  │  filters  │  │   Money   │  │   rules   │  │   │
//! │  │   │ Snapshot  │  │   stats   │  │  parsing  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The cart state machine and its presentation snapshots
//! - [`catalog`] - Billing filter, inventory search, dashboard stats
//! - [`types`] - Domain types (CatalogItem, CartLine, CheckoutRequest)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use medstock_core::{Cart, CatalogItem, Money};
//!
//! let paracetamol = CatalogItem::new("M1", "Paracetamol", 5);
//!
//! let mut cart = Cart::new();
//! cart.add_item(&paracetamol);
//! cart.add_item(&paracetamol);
//! cart.set_unit_price("M1", Money::from_major(12));
//!
//! assert_eq!(cart.compute_total(), Money::from_major(24));
//! let request = cart.to_checkout_request().unwrap();
//! assert_eq!(request.items[0].quantity, 2);
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartOutcome, CartSnapshot, CartTotals};
pub use catalog::{filter_addable, search_inventory, InventoryStats, StockPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

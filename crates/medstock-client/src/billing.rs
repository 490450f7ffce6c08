//! # Billing Session
//!
//! One cashier's billing screen: a catalog snapshot, the cart, and the two
//! services behind them.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout()                                      │
//! │                                                                         │
//! │   cart.to_checkout_request() ──── EmptyCart ──────────► Err (no call)   │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   CheckoutService::submit() ───── Err ────────────────► Err, cart kept  │
//! │            │                                                            │
//! │            ▼ Ok                                                         │
//! │   cart.reset()                                                          │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   CatalogProvider::list_available_items()  (failure only logged)       │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   CheckoutReceipt                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is only touched once the submission outcome is known. If the
//! `checkout()` future is dropped mid-flight the cart is left as it was.

use chrono::NaiveDate;
use medstock_core::{
    filter_addable, search_inventory, Cart, CartOutcome, CartSnapshot, CatalogItem,
    CheckoutRequest, InventoryStats, Money, StockPolicy,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ClientResult;
use crate::service::{CatalogProvider, CheckoutService};

/// What a successful checkout sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub request: CheckoutRequest,
    pub total: Money,
    /// False if the post-sale catalog refresh failed; the catalog snapshot
    /// is then stale until the next [`BillingSession::refresh_catalog`].
    pub catalog_refreshed: bool,
}

/// Billing screen state for one cashier.
pub struct BillingSession<C, S> {
    id: Uuid,
    cart: Cart,
    catalog: Vec<CatalogItem>,
    catalog_provider: C,
    checkout_service: S,
}

impl<C, S> BillingSession<C, S>
where
    C: CatalogProvider,
    S: CheckoutService,
{
    /// Starts a session with an empty cart and no catalog loaded.
    pub fn new(catalog_provider: C, checkout_service: S) -> Self {
        let id = Uuid::new_v4();
        debug!(session_id = %id, "Billing session started");
        BillingSession {
            id,
            cart: Cart::new(),
            catalog: Vec::new(),
            catalog_provider,
            checkout_service,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replaces the catalog snapshot with a fresh fetch.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn refresh_catalog(&mut self) -> ClientResult<usize> {
        let items = self.catalog_provider.list_available_items().await?;
        info!(session_id = %self.id, items = items.len(), "Catalog refreshed");
        self.catalog = items;
        Ok(self.catalog.len())
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    /// Product grid of the billing screen.
    pub fn addable(&self, term: &str) -> Vec<&CatalogItem> {
        filter_addable(&self.catalog, term)
    }

    /// Inventory list search.
    pub fn search_inventory(&self, term: &str) -> Vec<&CatalogItem> {
        search_inventory(&self.catalog, term)
    }

    /// Dashboard figures for the current snapshot.
    pub fn stats(&self, today: NaiveDate, policy: StockPolicy) -> InventoryStats {
        InventoryStats::compute(&self.catalog, today, policy)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of the catalog item with `item_id`.
    ///
    /// Returns `NotInCart` if the id is not in the catalog snapshot.
    pub fn add(&mut self, item_id: &str) -> CartOutcome {
        let outcome = match self.catalog.iter().find(|item| item.id == item_id) {
            Some(item) => self.cart.add_item(item),
            None => CartOutcome::NotInCart,
        };
        self.trace_outcome("add", item_id, outcome)
    }

    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> CartOutcome {
        let outcome = self.cart.set_quantity(item_id, quantity);
        self.trace_outcome("set_quantity", item_id, outcome)
    }

    pub fn increment(&mut self, item_id: &str) -> CartOutcome {
        let outcome = self.cart.increment(item_id);
        self.trace_outcome("increment", item_id, outcome)
    }

    pub fn decrement(&mut self, item_id: &str) -> CartOutcome {
        let outcome = self.cart.decrement(item_id);
        self.trace_outcome("decrement", item_id, outcome)
    }

    pub fn set_unit_price(&mut self, item_id: &str, price: Money) -> CartOutcome {
        let outcome = self.cart.set_unit_price(item_id, price);
        self.trace_outcome("set_unit_price", item_id, outcome)
    }

    pub fn remove(&mut self, item_id: &str) -> CartOutcome {
        let outcome = self.cart.remove_item(item_id);
        self.trace_outcome("remove", item_id, outcome)
    }

    /// Discards the in-progress sale.
    pub fn cancel(&mut self) {
        info!(session_id = %self.id, lines = self.cart.line_count(), "Sale cancelled");
        self.cart.reset();
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    fn trace_outcome(&self, action: &str, item_id: &str, outcome: CartOutcome) -> CartOutcome {
        match &outcome {
            CartOutcome::Applied => {
                debug!(session_id = %self.id, action, item_id, "Cart updated");
            }
            CartOutcome::StockExceeded { available, .. } => {
                debug!(session_id = %self.id, action, item_id, available, "Refused: stock exceeded");
            }
            CartOutcome::Rejected(reason) => {
                debug!(session_id = %self.id, action, item_id, %reason, "Refused: invalid input");
            }
            CartOutcome::NotInCart => {
                debug!(session_id = %self.id, action, item_id, "Ignored: unknown item");
            }
        }
        outcome
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submits the cart as a sale.
    ///
    /// ## Behavior
    /// - Empty cart: `Err(Core(EmptyCart))`, nothing is sent
    /// - Submission fails: the error is returned and the cart is untouched
    /// - Submission succeeds: the cart is reset and the catalog refetched
    pub async fn checkout(&mut self) -> ClientResult<CheckoutReceipt> {
        let request = self.cart.to_checkout_request()?;
        let total = request.total();

        info!(
            session_id = %self.id,
            lines = request.items.len(),
            units = request.total_quantity(),
            total = %total,
            "Submitting checkout"
        );

        if let Err(e) = self.checkout_service.submit(&request).await {
            warn!(session_id = %self.id, error = %e, retryable = e.is_retryable(), "Checkout failed");
            return Err(e);
        }

        self.cart.reset();
        info!(session_id = %self.id, total = %total, "Checkout complete");

        let catalog_refreshed = match self.refresh_catalog().await {
            Ok(_) => true,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Catalog refresh after checkout failed");
                false
            }
        };

        Ok(CheckoutReceipt {
            request,
            total,
            catalog_refreshed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::service::{MockCatalogProvider, MockCheckoutService};
    use async_trait::async_trait;
    use medstock_core::CoreError;
    use std::time::Duration;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("M1", "Paracetamol", 5),
            CatalogItem::new("M2", "Ibuprofen", 0),
            CatalogItem::new("M3", "Paraffin", 3),
        ]
    }

    fn provider_returning(times: usize) -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_list_available_items()
            .times(times)
            .returning(|| Ok(catalog()));
        provider
    }

    async fn loaded<S: CheckoutService>(
        provider: MockCatalogProvider,
        checkout: S,
    ) -> BillingSession<MockCatalogProvider, S> {
        let mut session = BillingSession::new(provider, checkout);
        session.refresh_catalog().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_refresh_and_views() {
        let session = loaded(provider_returning(1), MockCheckoutService::new()).await;

        assert_eq!(session.catalog().len(), 3);
        let names: Vec<_> = session.addable("para").iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Paracetamol", "Paraffin"]);
        assert_eq!(session.search_inventory("ibu").len(), 1);

        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let stats = session.stats(today, StockPolicy::default());
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.out_of_stock, 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_catalog() {
        let mut provider = MockCatalogProvider::new();
        let mut calls = 0;
        provider.expect_list_available_items().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(catalog())
            } else {
                Err(ClientError::Timeout)
            }
        });

        let mut session = loaded(provider, MockCheckoutService::new()).await;
        assert!(session.refresh_catalog().await.is_err());
        assert_eq!(session.catalog().len(), 3);
    }

    #[tokio::test]
    async fn test_add_uses_catalog_snapshot() {
        let mut session = loaded(provider_returning(1), MockCheckoutService::new()).await;

        for _ in 0..5 {
            assert!(session.add("M1").is_applied());
        }
        assert_eq!(
            session.add("M1"),
            CartOutcome::StockExceeded {
                item_id: "M1".into(),
                available: 5
            }
        );
        assert!(matches!(session.add("M2"), CartOutcome::StockExceeded { .. }));
        assert_eq!(session.add("nope"), CartOutcome::NotInCart);

        assert_eq!(session.snapshot().totals.total_quantity, 5);
    }

    #[tokio::test]
    async fn test_cart_pass_through() {
        let mut session = loaded(provider_returning(1), MockCheckoutService::new()).await;

        session.add("M1");
        session.add("M3");
        assert!(session.set_unit_price("M1", Money::from_major(50)).is_applied());
        assert!(session.set_quantity("M1", 2).is_applied());
        assert!(session.increment("M3").is_applied());
        assert!(session.decrement("M3").is_applied());
        assert!(matches!(session.decrement("M3"), CartOutcome::Rejected(_)));
        assert!(session.set_unit_price("M3", Money::from_major(30)).is_applied());

        assert_eq!(session.cart().compute_total(), Money::from_major(130));

        assert!(session.remove("M3").is_applied());
        assert_eq!(session.remove("M3"), CartOutcome::NotInCart);

        session.cancel();
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_empty_checkout_sends_nothing() {
        let mut checkout = MockCheckoutService::new();
        checkout.expect_submit().never();

        let mut session = loaded(provider_returning(1), checkout).await;
        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let mut checkout = MockCheckoutService::new();
        checkout
            .expect_submit()
            .times(1)
            .returning(|_| Err(ClientError::Api {
                status: 400,
                message: "Insufficient stock".into(),
            }));

        // Only the initial load; no refresh after a failed sale.
        let mut session = loaded(provider_returning(1), checkout).await;
        session.add("M1");
        session.add("M1");
        session.set_unit_price("M1", Money::from_major(12));
        let before = session.snapshot();

        assert!(session.checkout().await.is_err());
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_successful_checkout_resets_and_refreshes() {
        let mut checkout = MockCheckoutService::new();
        checkout
            .expect_submit()
            .withf(|request| {
                request.items.len() == 1
                    && request.items[0].item_id == "A"
                    && request.items[0].quantity == 3
                    && request.items[0].unit_price == Money::from_major(10)
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut provider = MockCatalogProvider::new();
        provider
            .expect_list_available_items()
            .times(2)
            .returning(|| Ok(vec![CatalogItem::new("A", "Amoxicillin", 10)]));

        let mut session = loaded(provider, checkout).await;
        for _ in 0..3 {
            session.add("A");
        }
        session.set_unit_price("A", Money::from_major(10));

        let receipt = session.checkout().await.unwrap();
        assert_eq!(receipt.total, Money::from_major(30));
        assert_eq!(receipt.request.total_quantity(), 3);
        assert!(receipt.catalog_refreshed);
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_after_sale_is_not_a_checkout_failure() {
        let mut checkout = MockCheckoutService::new();
        checkout.expect_submit().times(1).returning(|_| Ok(()));

        let mut provider = MockCatalogProvider::new();
        let mut calls = 0;
        provider.expect_list_available_items().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(catalog())
            } else {
                Err(ClientError::Http("connection reset".into()))
            }
        });

        let mut session = loaded(provider, checkout).await;
        session.add("M1");

        let receipt = session.checkout().await.unwrap();
        assert!(!receipt.catalog_refreshed);
        assert!(session.cart().is_empty());
    }

    struct SlowCheckout;

    #[async_trait]
    impl CheckoutService for SlowCheckout {
        async fn submit(&self, _request: &CheckoutRequest) -> ClientResult<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_checkout_keeps_cart() {
        let mut session = loaded(provider_returning(1), SlowCheckout).await;
        session.add("M1");

        let result = tokio::time::timeout(Duration::from_secs(1), session.checkout()).await;
        assert!(result.is_err());
        assert_eq!(session.cart().line_count(), 1);
    }
}

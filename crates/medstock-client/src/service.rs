//! # Service Seams
//!
//! The two collaborators the billing session needs from the outside world.
//! [`crate::api::AuthorizedApi`] implements both against the REST API;
//! tests use the generated mocks.

use async_trait::async_trait;
use medstock_core::{CatalogItem, CheckoutRequest};

#[cfg(test)]
use mockall::automock;

use crate::error::ClientResult;

/// Source of current stock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// A fresh catalog snapshot. Implementations must not cache.
    async fn list_available_items(&self) -> ClientResult<Vec<CatalogItem>>;
}

/// Accepts a finalized sale and decrements stock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    async fn submit(&self, request: &CheckoutRequest) -> ClientResult<()>;
}

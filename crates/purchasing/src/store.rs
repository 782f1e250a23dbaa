//! Purchase log store port.

use async_trait::async_trait;
use ghframes_core::{DomainResult, PurchaseId};

use crate::record::{NewPurchase, PurchasePatch, PurchaseRecord};

/// Simple CRUD over purchase records. No shared invariants with billing.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn get_purchase(&self, id: PurchaseId) -> DomainResult<Option<PurchaseRecord>>;

    /// All records, most recent purchase date first.
    async fn list_purchases(&self) -> DomainResult<Vec<PurchaseRecord>>;

    async fn insert_purchase(&self, new: NewPurchase) -> DomainResult<PurchaseRecord>;

    /// Apply an explicit-presence patch. `NotFound` if the record is absent.
    async fn update_purchase(
        &self,
        id: PurchaseId,
        patch: PurchasePatch,
    ) -> DomainResult<PurchaseRecord>;

    /// Permanently remove the record. `NotFound` if absent.
    async fn remove_purchase(&self, id: PurchaseId) -> DomainResult<()>;
}

//! Billing store port: invoice reads plus the atomic billing commit.

use async_trait::async_trait;
use ghframes_core::{DomainResult, InvoiceId};
use ghframes_inventory::StockMovementPlan;

use crate::invoice::Invoice;

/// The invoice side of a billing commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceWrite {
    Insert(Invoice),
    Update(Invoice),
    Delete(InvoiceId),
}

/// Store port used by the billing service.
///
/// `commit_billing` applies the stock movement plan and the invoice write in
/// one atomic step: every movement is validated before anything is applied,
/// and on failure neither invoices nor stock quantities change.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Option<Invoice>>;

    async fn list_invoices(&self) -> DomainResult<Vec<Invoice>>;

    async fn commit_billing(
        &self,
        plan: &StockMovementPlan,
        write: InvoiceWrite,
    ) -> DomainResult<()>;
}

//! The billing service: invoice lifecycle with stock consistency.

use std::sync::Arc;

use chrono::Utc;

use ghframes_core::{DomainError, DomainResult, InvoiceId};
use ghframes_inventory::{StockMovement, StockMovementPlan};

use crate::invoice::{Invoice, InvoiceDraft, InvoiceLine};
use crate::number::InvoiceNumber;
use crate::store::{InvoiceStore, InvoiceWrite};

/// Invoice lifecycle operations.
///
/// Invariant: for any stock item, the sum of quantities sold across live
/// invoices plus the quantity on hand is unchanged by any pure
/// create/edit/delete cycle. Each operation stages one [`StockMovementPlan`]
/// and commits it together with the invoice write, so a failure leaves the
/// store untouched.
pub struct BillingService<S: InvoiceStore + ?Sized> {
    store: Arc<S>,
}

impl<S: InvoiceStore + ?Sized> BillingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record a sale. Line quantities are issued from stock with no
    /// availability pre-check (quantity may go negative), but a line whose
    /// stock record is missing fails the whole operation with nothing
    /// applied.
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> DomainResult<Invoice> {
        let existing = self.store.list_invoices().await?;
        let number = InvoiceNumber::next_after(existing.iter().map(|i| &i.invoice_number));
        let invoice = Invoice::from_draft(draft, number, Utc::now())?;

        let plan = StockMovementPlan::issue_only(movements(&invoice.lines), false);
        self.store
            .commit_billing(&plan, InvoiceWrite::Insert(invoice.clone()))
            .await?;

        Ok(invoice)
    }

    /// All invoices, ordered by descending numeric invoice-number suffix
    /// (malformed suffixes sort as 0) regardless of insertion order.
    pub async fn list_invoices(&self) -> DomainResult<Vec<Invoice>> {
        let mut invoices = self.store.list_invoices().await?;
        invoices.sort_by(|a, b| b.invoice_number.sort_key().cmp(&a.invoice_number.sort_key()));
        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Invoice> {
        self.store
            .get_invoice(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    /// Permanently delete an invoice, restoring each line's quantity to
    /// stock. Lines whose stock record was deleted independently are
    /// silently skipped.
    pub async fn delete_invoice(&self, id: InvoiceId) -> DomainResult<()> {
        let invoice = self.get_invoice(id).await?;

        let plan = StockMovementPlan::restock_only(movements(&invoice.lines));
        self.store
            .commit_billing(&plan, InvoiceWrite::Delete(id))
            .await?;

        Ok(())
    }

    /// Edit an invoice: restock the stored lines, then issue the new ones
    /// with availability enforced against the post-restock quantities. The
    /// whole exchange is validated before any quantity moves, so a failed
    /// edit leaves the invoice and all stock untouched.
    pub async fn update_invoice(&self, id: InvoiceId, draft: InvoiceDraft) -> DomainResult<Invoice> {
        let stored = self.get_invoice(id).await?;
        let updated = stored.apply_draft(draft)?;

        let plan = StockMovementPlan {
            restock: movements(&stored.lines),
            issue: movements(&updated.lines),
            enforce_availability: true,
        };
        self.store
            .commit_billing(&plan, InvoiceWrite::Update(updated.clone()))
            .await?;

        Ok(updated)
    }
}

fn movements(lines: &[InvoiceLine]) -> Vec<StockMovement> {
    lines
        .iter()
        .map(|line| StockMovement {
            stock_item_id: line.stock_item_id,
            item: line.describe(),
            quantity: line.quantity,
        })
        .collect()
}

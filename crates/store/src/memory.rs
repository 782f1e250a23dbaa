//! In-memory store adapter.
//!
//! One `RwLock` over all three record maps keeps `commit_billing` trivially
//! atomic: the plan is staged and validated in full under the write lock
//! before any quantity or invoice record changes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use ghframes_billing::{Invoice, InvoiceStore, InvoiceWrite};
use ghframes_core::{DomainError, DomainResult, InvoiceId, PurchaseId, StockItemId};
use ghframes_inventory::{NewStockItem, StockItem, StockItemPatch, StockMovementPlan, StockStore};
use ghframes_purchasing::{NewPurchase, PurchasePatch, PurchaseRecord, PurchaseStore};

#[derive(Debug, Default)]
struct State {
    stocks: HashMap<StockItemId, StockItem>,
    invoices: HashMap<InvoiceId, Invoice>,
    purchases: HashMap<PurchaseId, PurchaseRecord>,
}

/// In-memory adapter for all three store ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| DomainError::storage("store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| DomainError::storage("store lock poisoned"))
    }
}

#[async_trait]
impl StockStore for MemoryStore {
    async fn get_stock(&self, id: StockItemId) -> DomainResult<Option<StockItem>> {
        Ok(self.read()?.stocks.get(&id).cloned())
    }

    async fn list_stocks(&self) -> DomainResult<Vec<StockItem>> {
        let mut items: Vec<StockItem> = self.read()?.stocks.values().cloned().collect();
        items.sort_by_key(|item| item.created_at);
        Ok(items)
    }

    async fn insert_stock(&self, new: NewStockItem) -> DomainResult<StockItem> {
        let item = StockItem::create(new, Utc::now())?;
        self.write()?.stocks.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_stock(
        &self,
        id: StockItemId,
        patch: StockItemPatch,
    ) -> DomainResult<StockItem> {
        let mut state = self.write()?;
        let item = state
            .stocks
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("stock item {id}")))?;
        item.apply_patch(patch, Utc::now())?;
        Ok(item.clone())
    }

    async fn remove_stock(&self, id: StockItemId) -> DomainResult<()> {
        self.write()?
            .stocks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("stock item {id}")))
    }

    async fn adjust_quantity(&self, id: StockItemId, delta: i64) -> DomainResult<StockItem> {
        let mut state = self.write()?;
        let item = state
            .stocks
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("stock item {id}")))?;
        item.quantity += delta;
        item.updated_at = Utc::now();
        Ok(item.clone())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn list_invoices(&self) -> DomainResult<Vec<Invoice>> {
        Ok(self.read()?.invoices.values().cloned().collect())
    }

    async fn commit_billing(
        &self,
        plan: &StockMovementPlan,
        write: InvoiceWrite,
    ) -> DomainResult<()> {
        let mut state = self.write()?;

        // Validate the invoice side first, then the whole plan; only then
        // touch anything.
        match &write {
            InvoiceWrite::Insert(invoice) => {
                let number_taken = state
                    .invoices
                    .values()
                    .any(|existing| existing.invoice_number == invoice.invoice_number);
                if number_taken {
                    return Err(DomainError::conflict(format!(
                        "invoice number {} already exists",
                        invoice.invoice_number
                    )));
                }
            }
            InvoiceWrite::Update(invoice) => {
                if !state.invoices.contains_key(&invoice.id) {
                    return Err(DomainError::not_found(format!("invoice {}", invoice.id)));
                }
            }
            InvoiceWrite::Delete(id) => {
                if !state.invoices.contains_key(id) {
                    return Err(DomainError::not_found(format!("invoice {id}")));
                }
            }
        }

        let staged = plan.stage(|id| state.stocks.get(&id).map(|item| item.quantity))?;

        let now = Utc::now();
        for (id, quantity) in staged {
            if let Some(item) = state.stocks.get_mut(&id) {
                item.quantity = quantity;
                item.updated_at = now;
            }
        }

        match write {
            InvoiceWrite::Insert(invoice) | InvoiceWrite::Update(invoice) => {
                state.invoices.insert(invoice.id, invoice);
            }
            InvoiceWrite::Delete(id) => {
                state.invoices.remove(&id);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn get_purchase(&self, id: PurchaseId) -> DomainResult<Option<PurchaseRecord>> {
        Ok(self.read()?.purchases.get(&id).cloned())
    }

    async fn list_purchases(&self) -> DomainResult<Vec<PurchaseRecord>> {
        let mut records: Vec<PurchaseRecord> = self.read()?.purchases.values().cloned().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn insert_purchase(&self, new: NewPurchase) -> DomainResult<PurchaseRecord> {
        let record = PurchaseRecord::create(new, Utc::now())?;
        self.write()?.purchases.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_purchase(
        &self,
        id: PurchaseId,
        patch: PurchasePatch,
    ) -> DomainResult<PurchaseRecord> {
        let mut state = self.write()?;
        let record = state
            .purchases
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("purchase {id}")))?;
        record.apply_patch(patch, Utc::now())?;
        Ok(record.clone())
    }

    async fn remove_purchase(&self, id: PurchaseId) -> DomainResult<()> {
        self.write()?
            .purchases
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("purchase {id}")))
    }
}

//! Inventory store port and the atomically-committed stock movement plan.

use std::collections::HashMap;

use async_trait::async_trait;
use ghframes_core::{DomainError, DomainResult, StockItemId};

use crate::item::{NewStockItem, StockItem, StockItemPatch};

/// One stock delta within a plan. `item` is the snapshotted size/variant
/// label carried so failures can name the line even when the stock record is
/// gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub stock_item_id: StockItemId,
    pub item: String,
    pub quantity: i64,
}

/// An explicit list of stock adjustments committed all-or-nothing.
///
/// `restock` movements increment quantity; a movement whose stock record no
/// longer exists is silently skipped (invoice lines hold weak references).
/// `issue` movements decrement quantity; a missing record fails the whole
/// plan, and when `enforce_availability` is set, so does a request exceeding
/// the quantity on hand after this plan's restocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockMovementPlan {
    pub restock: Vec<StockMovement>,
    pub issue: Vec<StockMovement>,
    pub enforce_availability: bool,
}

impl StockMovementPlan {
    pub fn restock_only(restock: Vec<StockMovement>) -> Self {
        Self {
            restock,
            issue: Vec::new(),
            enforce_availability: false,
        }
    }

    pub fn issue_only(issue: Vec<StockMovement>, enforce_availability: bool) -> Self {
        Self {
            restock: Vec::new(),
            issue,
            enforce_availability,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.restock.is_empty() && self.issue.is_empty()
    }

    /// Validate the whole plan against current on-hand quantities and return
    /// the final quantity for every touched stock item.
    ///
    /// `on_hand` resolves a stock item to its current quantity (`None` when
    /// the record does not exist). Movements are staged in plan order —
    /// restocks first, then issues — so availability is checked against the
    /// post-restock quantity, and repeated lines for the same item compound.
    /// No error leaves anything half-staged: adapters apply the returned
    /// quantities only after `stage` succeeds as a whole.
    pub fn stage<F>(&self, on_hand: F) -> DomainResult<HashMap<StockItemId, i64>>
    where
        F: Fn(StockItemId) -> Option<i64>,
    {
        let mut staged: HashMap<StockItemId, i64> = HashMap::new();

        for movement in &self.restock {
            let current = match staged.get(&movement.stock_item_id) {
                Some(q) => *q,
                // A restocked item whose record was deleted independently is
                // skipped: invoice lines hold weak references.
                None => match on_hand(movement.stock_item_id) {
                    Some(q) => q,
                    None => continue,
                },
            };
            staged.insert(movement.stock_item_id, current + movement.quantity);
        }

        for movement in &self.issue {
            let current = match staged.get(&movement.stock_item_id) {
                Some(q) => *q,
                None => on_hand(movement.stock_item_id).ok_or_else(|| {
                    DomainError::not_found(format!("stock for item: {}", movement.item))
                })?,
            };
            if self.enforce_availability && current < movement.quantity {
                return Err(DomainError::InsufficientStock {
                    item: movement.item.clone(),
                    available: current,
                    requested: movement.quantity,
                });
            }
            staged.insert(movement.stock_item_id, current - movement.quantity);
        }

        Ok(staged)
    }
}

/// Store port for stock-keeping records.
///
/// The store is the sole authority on current quantity. `adjust_quantity`
/// does not enforce non-negativity; billing goes through `commit_billing`
/// (on the billing store) which validates a whole plan before applying any
/// of it.
#[async_trait]
pub trait StockStore: Send + Sync {
    async fn get_stock(&self, id: StockItemId) -> DomainResult<Option<StockItem>>;

    async fn list_stocks(&self) -> DomainResult<Vec<StockItem>>;

    async fn insert_stock(&self, new: NewStockItem) -> DomainResult<StockItem>;

    /// Apply an explicit-presence patch. `NotFound` if the record is absent.
    async fn update_stock(&self, id: StockItemId, patch: StockItemPatch)
    -> DomainResult<StockItem>;

    /// Permanently remove the record. `NotFound` if absent.
    async fn remove_stock(&self, id: StockItemId) -> DomainResult<()>;

    /// Add `delta` (may be negative) to the on-hand quantity and persist.
    async fn adjust_quantity(&self, id: StockItemId, delta: i64) -> DomainResult<StockItem>;
}

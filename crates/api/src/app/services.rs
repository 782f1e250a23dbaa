//! Store selection and service construction.

use std::sync::Arc;

use ghframes_billing::{BillingService, InvoiceStore};
use ghframes_core::DomainResult;
use ghframes_inventory::StockStore;
use ghframes_purchasing::PurchaseStore;
use ghframes_store::{MemoryStore, PgStore};

/// Everything the handlers need, wired over one shared store.
pub struct AppServices {
    pub stocks: Arc<dyn StockStore>,
    pub billing: BillingService<dyn InvoiceStore>,
    pub purchases: Arc<dyn PurchaseStore>,
}

impl AppServices {
    /// Wire all services over a single store instance so billing commits and
    /// direct stock reads observe the same state.
    pub fn over<S>(store: Arc<S>) -> Self
    where
        S: StockStore + InvoiceStore + PurchaseStore + 'static,
    {
        let invoices: Arc<dyn InvoiceStore> = store.clone();
        Self {
            stocks: store.clone(),
            billing: BillingService::new(invoices),
            purchases: store,
        }
    }
}

/// Pick the backing store from the environment.
///
/// `DATABASE_URL` set: connect to Postgres and run migrations. Otherwise an
/// in-memory store, which loses all data on restart.
pub async fn build_services() -> DomainResult<AppServices> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url).await?;
            store.migrate().await?;
            tracing::info!("using postgres store");
            Ok(AppServices::over(Arc::new(store)))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Ok(AppServices::over(Arc::new(MemoryStore::new())))
        }
    }
}

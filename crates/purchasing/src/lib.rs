//! `ghframes-purchasing` — the vendor purchase log.
//!
//! Purchase records are an independent ledger of what was bought from
//! vendors. They carry no foreign relationship to stock items and never
//! touch on-hand quantities.

pub mod record;
pub mod store;

pub use record::{NewPurchase, PurchasePatch, PurchaseRecord};
pub use store::PurchaseStore;

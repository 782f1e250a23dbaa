//! `ghframes-billing` — invoices, the invoice-number sequencer, and the
//! billing service.
//!
//! The billing service is the only component permitted to mutate invoice and
//! stock state together. Every operation stages an explicit
//! [`StockMovementPlan`](ghframes_inventory::StockMovementPlan) and commits
//! it with the invoice write in a single atomic step, so a failed operation
//! leaves both invoices and stock quantities untouched.

pub mod invoice;
pub mod number;
pub mod service;
pub mod store;

pub use invoice::{DraftLine, Invoice, InvoiceDraft, InvoiceLine};
pub use number::InvoiceNumber;
pub use service::BillingService;
pub use store::{InvoiceStore, InvoiceWrite};

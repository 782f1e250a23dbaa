//! `ghframes-store` — adapters for the inventory, billing, and purchase
//! store ports.
//!
//! Two adapters: [`MemoryStore`] (RwLock'd maps, used by tests and dev mode)
//! and, behind the `postgres` feature, [`postgres::PgStore`] (sqlx). Both
//! commit a billing operation's stock movements and invoice write
//! all-or-nothing: the in-memory adapter under one write lock, the Postgres
//! adapter inside one transaction with row locks.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;


pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

//! `ghframes-inventory` — stock-keeping records and the inventory store port.
//!
//! A `StockItem` is one frame size/variant combination with a price and an
//! on-hand quantity. The quantity is the only field with strong consistency
//! requirements: it is mutated by direct admin edits and, atomically via
//! [`StockMovementPlan`], by the billing service.

pub mod item;
pub mod store;

pub use item::{NewStockItem, StockItem, StockItemPatch};
pub use store::{StockMovement, StockMovementPlan, StockStore};

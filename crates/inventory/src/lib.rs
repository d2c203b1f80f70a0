//! `shelfline-inventory` — the authoritative product inventory.
//!
//! Owns the product records, the filter criteria, and the locked store that
//! guarantees the stock-never-negative invariant under concurrent purchases.

pub mod filter;
pub mod record;
pub mod store;

pub use filter::FilterCriterion;
pub use record::ProductRecord;
pub use store::{InventoryFlush, InventoryStore, NullFlush};

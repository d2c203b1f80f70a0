use std::collections::HashMap;
use std::sync::RwLock;

use shelfline_core::{CoreError, CoreResult};

use crate::filter::FilterCriterion;
use crate::record::{ProductRecord, normalize_name};

/// Durable-storage collaborator invoked after each successful mutation.
///
/// The store calls `flush` synchronously with the full current record set
/// while still holding its write lock, so flushes are serialized and each
/// one sees a consistent snapshot.
pub trait InventoryFlush: Send + Sync {
    fn flush(&self, records: &[ProductRecord]) -> CoreResult<()>;
}

/// No-op flusher for callers that have no durable source (tests, tooling).
#[derive(Debug, Default)]
pub struct NullFlush;

impl InventoryFlush for NullFlush {
    fn flush(&self, _records: &[ProductRecord]) -> CoreResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct Inner {
    /// Records in load order; iteration order is part of the contract
    /// (the stock forecaster consumes it as its input sequence).
    records: Vec<ProductRecord>,
    /// Normalized name -> position in `records`.
    index: HashMap<String, usize>,
}

/// Single source of truth for product state.
///
/// A whole-store `RwLock` serializes mutations: the read-check-decrement
/// sequence in [`purchase`](InventoryStore::purchase) is atomic with respect
/// to concurrent purchases, and readers always observe a consistent
/// snapshot, never a value torn mid-write.
#[derive(Debug)]
pub struct InventoryStore {
    inner: RwLock<Inner>,
}

impl InventoryStore {
    /// Build a store from records in load order.
    ///
    /// Rejects duplicate normalized names: no two records may share an
    /// identity key.
    pub fn from_records(records: Vec<ProductRecord>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            let key = record.normalized_name();
            if index.insert(key.clone(), pos).is_some() {
                return Err(CoreError::invalid_input(format!(
                    "duplicate product name '{key}' in inventory data"
                )));
            }
        }
        Ok(Self {
            inner: RwLock::new(Inner { records, index }),
        })
    }

    /// Case-insensitive exact lookup. `None` is an expected miss, not an error.
    pub fn find(&self, name: &str) -> Option<ProductRecord> {
        let inner = self.inner.read().unwrap();
        let pos = *inner.index.get(&normalize_name(name))?;
        Some(inner.records[pos].clone())
    }

    /// Atomically purchase `quantity` units of `name`.
    ///
    /// Holds the write lock across check, decrement, and flush. If the
    /// flush fails the decrement is rolled back before the lock is
    /// released, so in-memory and durable state never diverge silently.
    /// Returns the remaining stock.
    pub fn purchase(
        &self,
        name: &str,
        quantity: u64,
        flusher: &dyn InventoryFlush,
    ) -> CoreResult<u64> {
        if quantity == 0 {
            return Err(CoreError::invalid_input("quantity must be greater than zero"));
        }

        let mut inner = self.inner.write().unwrap();
        let pos = *inner
            .index
            .get(&normalize_name(name))
            .ok_or(CoreError::NotFound)?;

        let available = inner.records[pos].stock;
        if available < quantity {
            return Err(CoreError::InsufficientStock { available });
        }

        inner.records[pos].stock = available - quantity;

        if let Err(e) = flusher.flush(&inner.records) {
            inner.records[pos].stock = available;
            tracing::error!(product = %inner.records[pos].name, error = %e, "purchase flush failed; rolled back");
            return Err(e);
        }

        let remaining = inner.records[pos].stock;
        tracing::info!(product = %inner.records[pos].name, quantity, remaining, "purchase committed");
        Ok(remaining)
    }

    /// Records matching `criterion`, in load order.
    pub fn filter(&self, criterion: &FilterCriterion) -> Vec<ProductRecord> {
        let inner = self.inner.read().unwrap();
        inner
            .records
            .iter()
            .filter(|r| criterion.matches(r))
            .cloned()
            .collect()
    }

    /// Snapshot of every record, in load order.
    pub fn all_records(&self) -> Vec<ProductRecord> {
        self.inner.read().unwrap().records.clone()
    }

    /// Current per-product stock levels, in load order.
    pub fn stock_levels(&self) -> Vec<f64> {
        let inner = self.inner.read().unwrap();
        inner.records.iter().map(|r| r.stock as f64).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

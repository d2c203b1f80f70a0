use serde::{Deserialize, Serialize};

use shelfline_core::{CoreError, CoreResult};

/// One product's inventory entry.
///
/// `name` is the identity key: comparisons are case-insensitive, display
/// preserves the original casing. `quantity_sold` is a fixed historical
/// counter used only as regression training signal; purchases never touch
/// it. It may be absent for rows whose source cell was blank or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u64,
    pub is_best_seller: bool,
    pub quantity_sold: Option<u64>,
}

impl ProductRecord {
    /// Validate a record before it enters the store.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: u64,
        is_best_seller: bool,
        quantity_sold: Option<u64>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::invalid_input("product name cannot be empty"));
        }
        if !(price.is_finite() && price >= 0.0) {
            return Err(CoreError::invalid_input(format!(
                "price must be a non-negative number, got {price}"
            )));
        }
        Ok(Self {
            name,
            category: category.into(),
            price,
            stock,
            is_best_seller,
            quantity_sold,
        })
    }

    /// Case-folded identity key used by the store's index.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Normalization applied to every name before lookup or indexing.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shelfline_core::{CoreError, CoreResult};
use shelfline_inventory::{InventoryFlush, ProductRecord};

/// CSV-backed durable source keyed by product name.
///
/// Column layout follows the upstream data file: `Product Name, Category,
/// Price, Stock, Best Seller, Quantity Sold`. Booleans may arrive in
/// pandas form (`True`/`False`) and `Quantity Sold` cells may be blank;
/// both load cleanly.
#[derive(Debug, Clone)]
pub struct CsvInventory {
    path: PathBuf,
}

/// On-disk row shape. Kept separate from [`ProductRecord`] so the domain
/// type is not tied to the file's column headers.
#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    #[serde(rename = "Product Name")]
    name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Stock")]
    stock: u64,
    #[serde(rename = "Best Seller", serialize_with = "pandas_bool::serialize", deserialize_with = "pandas_bool::deserialize")]
    is_best_seller: bool,
    #[serde(rename = "Quantity Sold")]
    quantity_sold: Option<u64>,
}

impl From<&ProductRecord> for RecordRow {
    fn from(r: &ProductRecord) -> Self {
        Self {
            name: r.name.clone(),
            category: r.category.clone(),
            price: r.price,
            stock: r.stock,
            is_best_seller: r.is_best_seller,
            quantity_sold: r.quantity_sold,
        }
    }
}

impl CsvInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record set in file order. Called once at startup.
    pub fn load(&self) -> CoreResult<Vec<ProductRecord>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            CoreError::persistence(format!("cannot open {}: {e}", self.path.display()))
        })?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<RecordRow>().enumerate() {
            let row = row.map_err(|e| {
                CoreError::persistence(format!(
                    "bad row {} in {}: {e}",
                    line + 2, // header + 1-based
                    self.path.display()
                ))
            })?;
            records.push(ProductRecord::new(
                row.name,
                row.category,
                row.price,
                row.stock,
                row.is_best_seller,
                row.quantity_sold,
            )?);
        }

        tracing::info!(path = %self.path.display(), count = records.len(), "inventory loaded");
        Ok(records)
    }

    fn write_all(&self, records: &[ProductRecord]) -> CoreResult<()> {
        // Write the complete set to a sibling temp file, then rename into
        // place so a crash mid-flush cannot leave a truncated data file.
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp).map_err(|e| {
                CoreError::persistence(format!("cannot create {}: {e}", tmp.display()))
            })?;
            for record in records {
                writer
                    .serialize(RecordRow::from(record))
                    .map_err(|e| CoreError::persistence(format!("write failed: {e}")))?;
            }
            writer
                .flush()
                .map_err(|e| CoreError::persistence(format!("flush failed: {e}")))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            CoreError::persistence(format!("cannot replace {}: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "inventory flushed");
        Ok(())
    }
}

impl InventoryFlush for CsvInventory {
    fn flush(&self, records: &[ProductRecord]) -> CoreResult<()> {
        self.write_all(records)
    }
}

/// Serde helpers for pandas-style booleans (`True`/`False`, also accepts
/// `true`/`false`/`1`/`0`).
mod pandas_bool {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("shelfline-{}-{name}.csv", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_pandas_style_rows_in_file_order() {
        let path = temp_csv(
            "load",
            "Product Name,Category,Price,Stock,Best Seller,Quantity Sold\n\
             Milk,Dairy,50,10,True,20\n\
             Cola,Beverage,150.5,5,False,\n",
        );
        let records = CsvInventory::new(&path).load().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Milk");
        assert!(records[0].is_best_seller);
        assert_eq!(records[0].quantity_sold, Some(20));
        assert_eq!(records[1].price, 150.5);
        assert_eq!(records[1].quantity_sold, None);
    }

    #[test]
    fn missing_file_is_a_persistence_error() {
        let err = CsvInventory::new("/nonexistent/shelfline.csv").load().unwrap_err();
        assert!(matches!(err, CoreError::Persistence(_)));
    }

    #[test]
    fn flush_then_load_round_trips_the_record_set() {
        let path = temp_csv(
            "roundtrip",
            "Product Name,Category,Price,Stock,Best Seller,Quantity Sold\n",
        );
        let store = CsvInventory::new(&path);

        let records = vec![
            ProductRecord::new("Milk", "Dairy", 50.0, 7, true, Some(20)).unwrap(),
            ProductRecord::new("Bread", "Bakery", 35.0, 12, false, None).unwrap(),
        ];
        store.flush(&records).unwrap();

        let loaded = store.load().unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, records);
    }

    #[test]
    fn malformed_row_reports_its_line() {
        let path = temp_csv(
            "badrow",
            "Product Name,Category,Price,Stock,Best Seller,Quantity Sold\n\
             Milk,Dairy,not-a-price,10,True,20\n",
        );
        let err = CsvInventory::new(&path).load().unwrap_err();
        fs::remove_file(&path).ok();
        match err {
            CoreError::Persistence(msg) => assert!(msg.contains("row 2")),
            other => panic!("expected persistence error, got {other:?}"),
        }
    }
}

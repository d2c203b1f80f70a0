use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use shelfline_analytics::ChartImage;
use shelfline_core::{CoreError, CoreResult};
use shelfline_inventory::ProductRecord;

use crate::app::services::SalesTarget;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub product_name: String,
    /// Signed on the wire so a negative quantity reports `InvalidInput`
    /// instead of failing JSON extraction.
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub filter_type: Option<String>,
    pub value: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PredictSalesParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictStockParams {
    pub days: Option<i64>,
}

impl PredictSalesParams {
    /// Resolve the `type` tag and its parameter into a prediction target.
    pub fn into_target(self) -> CoreResult<SalesTarget> {
        match self.kind.as_deref() {
            Some("product") => Ok(SalesTarget::Product {
                name: self.product_name.unwrap_or_default(),
            }),
            Some("category") => Ok(SalesTarget::Category {
                name: self.category.unwrap_or_default(),
            }),
            Some("best_seller") => Ok(SalesTarget::BestSellers),
            Some("price") => Ok(SalesTarget::Price {
                raw: self.price.unwrap_or_default(),
            }),
            Some(other) => Err(CoreError::invalid_input(format!(
                "unknown prediction type '{other}' (expected product, category, best_seller, or price)"
            ))),
            None => Err(CoreError::invalid_input("missing prediction type")),
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn record_to_json(record: &ProductRecord) -> JsonValue {
    json!({
        "name": record.name,
        "category": record.category,
        "price": record.price,
        "stock": record.stock,
        "is_best_seller": record.is_best_seller,
        "quantity_sold": record.quantity_sold,
    })
}

pub fn records_to_json(records: &[ProductRecord]) -> JsonValue {
    JsonValue::Array(records.iter().map(record_to_json).collect())
}

pub fn chart_to_json(chart: &ChartImage) -> JsonValue {
    json!({
        "media_type": chart.media_type,
        "data": chart.data,
    })
}

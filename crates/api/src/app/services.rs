use std::sync::Arc;

use shelfline_analytics::{ChartImage, DemandModel, chart, forecast_stock};
use shelfline_core::{CoreError, CoreResult};
use shelfline_inventory::{FilterCriterion, InventoryFlush, InventoryStore, ProductRecord};

/// What a sales prediction should be computed against.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesTarget {
    /// A single product's price, resolved by case-insensitive name.
    Product { name: String },
    /// Mean price across a category.
    Category { name: String },
    /// Mean price across best-seller records.
    BestSellers,
    /// A caller-supplied price, unparsed; validation happens here so bad
    /// input reports `InvalidInput` instead of failing at the edge.
    Price { raw: String },
}

/// Successful purchase outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    /// Display name as stored (original casing).
    pub product: String,
    pub quantity: u64,
    pub remaining: u64,
}

/// Successful sales prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesPrediction {
    pub message: String,
    pub estimate: f64,
    pub chart: ChartImage,
}

/// Successful stock forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct StockForecast {
    pub message: String,
    pub values: Vec<f64>,
    pub chart: ChartImage,
}

/// Orchestration layer between the HTTP surface and the core components.
///
/// Owns the store, the flush collaborator, and the once-trained demand
/// model. All input validation happens here, before any component is
/// touched; every failure surfaces as a `CoreError`, never a panic.
pub struct QueryService {
    store: InventoryStore,
    flusher: Arc<dyn InventoryFlush>,
    /// Trained once at construction from the startup snapshot; `None` when
    /// the dataset cannot support a fit (predictions then answer
    /// `ModelNotTrained`). Never retrained from later purchases.
    demand: Option<DemandModel>,
}

impl QueryService {
    pub fn new(store: InventoryStore, flusher: Arc<dyn InventoryFlush>) -> Self {
        let demand = match DemandModel::train(&store.all_records()) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!(error = %e, "demand model unavailable; sales predictions disabled");
                None
            }
        };
        Self {
            store,
            flusher,
            demand,
        }
    }

    pub fn search(&self, name: &str) -> CoreResult<ProductRecord> {
        let name = non_empty(name, "product name")?;
        self.store.find(name).ok_or(CoreError::NotFound)
    }

    pub fn purchase(&self, name: &str, quantity: u64) -> CoreResult<PurchaseOutcome> {
        let name = non_empty(name, "product name")?;
        let remaining = self.store.purchase(name, quantity, self.flusher.as_ref())?;
        // The record cannot disappear between the purchase and this lookup;
        // nothing removes records at runtime.
        let product = self
            .store
            .find(name)
            .map(|r| r.name)
            .unwrap_or_else(|| name.to_string());
        Ok(PurchaseOutcome {
            product,
            quantity,
            remaining,
        })
    }

    pub fn filter(&self, criterion: &FilterCriterion) -> Vec<ProductRecord> {
        self.store.filter(criterion)
    }

    pub fn predict_sales(&self, target: &SalesTarget) -> CoreResult<SalesPrediction> {
        let model = self.demand.as_ref().ok_or(CoreError::ModelNotTrained)?;

        let (price, title, subject) = match target {
            SalesTarget::Product { name } => {
                let name = non_empty(name, "product name")?;
                let record = self.store.find(name).ok_or(CoreError::NotFound)?;
                let title = format!("Sales Prediction for {}", record.name);
                (record.price, title, record.name)
            }
            SalesTarget::Category { name } => {
                let name = non_empty(name, "category")?;
                let matches = self.store.filter(&FilterCriterion::Category(name.to_string()));
                let price = mean_price(&matches).ok_or(CoreError::NotFound)?;
                let title = format!("Sales Prediction for {name} Category");
                (price, title, format!("{name} category"))
            }
            SalesTarget::BestSellers => {
                let matches = self.store.filter(&FilterCriterion::BestSeller);
                let price = mean_price(&matches).ok_or(CoreError::NotFound)?;
                let title = "Sales Prediction for Best Sellers".to_string();
                (price, title, "best sellers".to_string())
            }
            SalesTarget::Price { raw } => {
                let price: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| CoreError::invalid_input(format!("'{raw}' is not a number")))?;
                if !(price.is_finite() && price >= 0.0) {
                    return Err(CoreError::invalid_input(format!(
                        "price must be a non-negative number, got {price}"
                    )));
                }
                (price, format!("Sales Prediction for Price {price:.2}"), format!("price {price:.2}"))
            }
        };

        let estimate = model.predict(price);
        let chart = chart::demand_chart(
            model.samples(),
            model.slope(),
            model.intercept(),
            price,
            &title,
        )?;

        tracing::info!(%subject, price, estimate, "sales prediction served");

        Ok(SalesPrediction {
            message: format!(
                "Predicted sales for {subject} (price {price:.2}): {estimate:.2} units"
            ),
            estimate,
            chart,
        })
    }

    /// Always refit from the live stock snapshot, unlike the demand model.
    pub fn predict_stock(&self, days: usize) -> CoreResult<StockForecast> {
        let history = self.store.stock_levels();
        let values = forecast_stock(&history, days)?;
        let chart = chart::forecast_chart(&history, &values)?;

        tracing::info!(days, points = history.len(), "stock forecast served");

        Ok(StockForecast {
            message: format!("Stock prediction for next {days} days"),
            values,
            chart,
        })
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> CoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_input(format!("{what} cannot be empty")));
    }
    Ok(trimmed)
}

fn mean_price(records: &[ProductRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().map(|r| r.price).sum::<f64>() / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use shelfline_inventory::store::NullFlush;

    use super::*;

    fn record(
        name: &str,
        category: &str,
        price: f64,
        stock: u64,
        best: bool,
        sold: Option<u64>,
    ) -> ProductRecord {
        ProductRecord::new(name, category, price, stock, best, sold).unwrap()
    }

    fn service_with(records: Vec<ProductRecord>) -> QueryService {
        let store = InventoryStore::from_records(records).unwrap();
        QueryService::new(store, Arc::new(NullFlush))
    }

    fn full_service() -> QueryService {
        service_with(vec![
            record("Milk", "Dairy", 50.0, 10, true, Some(20)),
            record("Cola", "Beverage", 150.0, 5, false, Some(10)),
            record("Bread", "Bakery", 80.0, 12, true, Some(35)),
            record("Soap", "Household", 100.0, 40, false, Some(40)),
        ])
    }

    #[test]
    fn search_is_case_insensitive_and_misses_report_not_found() {
        let service = full_service();
        assert_eq!(service.search("mILk").unwrap().name, "Milk");
        assert_eq!(service.search("caviar").unwrap_err(), CoreError::NotFound);
        assert!(matches!(service.search("  ").unwrap_err(), CoreError::InvalidInput(_)));
    }

    #[test]
    fn purchase_reports_display_name_and_remaining_stock() {
        let service = full_service();
        let outcome = service.purchase("milk", 3).unwrap();
        assert_eq!(outcome.product, "Milk");
        assert_eq!(outcome.remaining, 7);

        let err = service.purchase("Milk", 100).unwrap_err();
        assert_eq!(err, CoreError::InsufficientStock { available: 7 });
    }

    #[test]
    fn predict_sales_by_product_uses_that_products_price() {
        let service = full_service();
        let prediction = service
            .predict_sales(&SalesTarget::Product { name: "milk".to_string() })
            .unwrap();
        assert!(prediction.message.contains("Milk"));
        assert!(prediction.message.contains("50.00"));
        assert!(!prediction.chart.data.is_empty());
    }

    #[test]
    fn predict_sales_by_category_uses_the_mean_price() {
        let service = full_service();
        // Dairy has only Milk at 50; estimate must equal the direct price variant.
        let by_category = service
            .predict_sales(&SalesTarget::Category { name: "Dairy".to_string() })
            .unwrap();
        let by_price = service
            .predict_sales(&SalesTarget::Price { raw: "50".to_string() })
            .unwrap();
        assert_eq!(by_category.estimate, by_price.estimate);
    }

    #[test]
    fn predict_sales_for_missing_sets_reports_not_found() {
        let service = full_service();
        let err = service
            .predict_sales(&SalesTarget::Category { name: "Electronics".to_string() })
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound);

        let no_best_sellers = service_with(vec![
            record("A", "X", 10.0, 1, false, Some(5)),
            record("B", "X", 20.0, 1, false, Some(6)),
        ]);
        assert_eq!(
            no_best_sellers.predict_sales(&SalesTarget::BestSellers).unwrap_err(),
            CoreError::NotFound
        );
    }

    #[test]
    fn predict_sales_rejects_unparsable_or_negative_price() {
        let service = full_service();
        for raw in ["abc", "-5", "NaN"] {
            let err = service
                .predict_sales(&SalesTarget::Price { raw: raw.to_string() })
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)), "raw = {raw}");
        }
    }

    #[test]
    fn untrained_model_answers_model_not_trained() {
        // No record carries quantity_sold, so training fails at startup.
        let service = service_with(vec![
            record("A", "X", 10.0, 1, false, None),
            record("B", "X", 20.0, 1, false, None),
        ]);
        let err = service
            .predict_sales(&SalesTarget::Price { raw: "10".to_string() })
            .unwrap_err();
        assert_eq!(err, CoreError::ModelNotTrained);
    }

    #[test]
    fn demand_model_is_not_retrained_by_purchases() {
        let service = full_service();
        let before = service
            .predict_sales(&SalesTarget::Price { raw: "70".to_string() })
            .unwrap();
        service.purchase("milk", 5).unwrap();
        let after = service
            .predict_sales(&SalesTarget::Price { raw: "70".to_string() })
            .unwrap();
        assert_eq!(before.estimate, after.estimate);
    }

    #[test]
    fn predict_stock_reads_the_live_store() {
        let service = full_service();
        let before = service.predict_stock(3).unwrap();
        assert_eq!(before.values.len(), 3);

        // A purchase changes the stock sequence, so the refit sees new data.
        service.purchase("soap", 30).unwrap();
        let after = service.predict_stock(3).unwrap();
        assert_ne!(before.values, after.values);
    }

    #[test]
    fn predict_stock_with_too_few_products_is_a_forecast_error() {
        let service = service_with(vec![record("Solo", "X", 10.0, 5, false, Some(1))]);
        let err = service.predict_stock(5).unwrap_err();
        assert!(matches!(err, CoreError::Forecast(_)));
    }

    #[test]
    fn predict_stock_rejects_zero_days() {
        let service = full_service();
        assert!(matches!(
            service.predict_stock(0).unwrap_err(),
            CoreError::InvalidInput(_)
        ));
    }
}

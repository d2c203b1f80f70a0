use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use shelfline_core::CoreError;

use crate::app::services::QueryService;
use crate::app::{dto, errors};

/// GET /predict_sales?type=...&product_name=...&category=...&price=...
///
/// Responds with the `{success, message, estimate, image}` envelope; both
/// outcomes are HTTP 200, matching the historical contract.
pub async fn predict_sales(
    Extension(service): Extension<Arc<QueryService>>,
    Query(params): Query<dto::PredictSalesParams>,
) -> axum::response::Response {
    let target = match params.into_target() {
        Ok(t) => t,
        Err(e) => return errors::prediction_failure(e),
    };

    match service.predict_sales(&target) {
        Ok(prediction) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": prediction.message,
                "estimate": prediction.estimate,
                "image": dto::chart_to_json(&prediction.chart),
            })),
        )
            .into_response(),
        Err(e) => errors::prediction_failure(e),
    }
}

/// GET /predict_stock?days=N (defaults to 5, must be >= 1).
pub async fn predict_stock(
    Extension(service): Extension<Arc<QueryService>>,
    Query(params): Query<dto::PredictStockParams>,
) -> axum::response::Response {
    let days = params.days.unwrap_or(5);
    if days < 1 {
        return errors::prediction_failure(CoreError::invalid_input("days must be >= 1"));
    }

    match service.predict_stock(days as usize) {
        Ok(forecast) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": forecast.message,
                "forecast": forecast.values,
                "image": dto::chart_to_json(&forecast.chart),
            })),
        )
            .into_response(),
        Err(e) => errors::prediction_failure(e),
    }
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use shelfline_core::CoreError;
use shelfline_inventory::FilterCriterion;

use crate::app::services::QueryService;
use crate::app::{dto, errors};

/// GET /search?product_name=...
///
/// Success returns the matching record as a single-element collection
/// (the shape the historical surface exposed); misses are plain strings.
pub async fn search(
    Extension(service): Extension<Arc<QueryService>>,
    Query(params): Query<dto::SearchParams>,
) -> axum::response::Response {
    let name = params.product_name.unwrap_or_default();
    match service.search(&name) {
        Ok(record) => (StatusCode::OK, Json(dto::records_to_json(&[record]))).into_response(),
        Err(e) => errors::plain_error_response(e),
    }
}

/// POST /buy with JSON `{product_name, quantity}`.
pub async fn buy(
    Extension(service): Extension<Arc<QueryService>>,
    Json(body): Json<dto::BuyRequest>,
) -> axum::response::Response {
    if body.quantity <= 0 {
        return errors::plain_error_response(CoreError::invalid_input(
            "quantity must be greater than zero",
        ));
    }

    match service.purchase(&body.product_name, body.quantity as u64) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!(format!(
                "Purchased {} of {}. Remaining stock: {}.",
                outcome.quantity, outcome.product, outcome.remaining
            ))),
        )
            .into_response(),
        Err(e) => errors::plain_error_response(e),
    }
}

/// GET /filter?filter_type=...&value=...&min_price=...&max_price=...
pub async fn filter(
    Extension(service): Extension<Arc<QueryService>>,
    Query(params): Query<dto::FilterParams>,
) -> axum::response::Response {
    let criterion = match FilterCriterion::parse(
        params.filter_type.as_deref().unwrap_or(""),
        params.value.as_deref(),
        params.min_price,
        params.max_price,
    ) {
        Ok(c) => c,
        Err(e) => return errors::plain_error_response(e),
    };

    let records = service.filter(&criterion);
    (StatusCode::OK, Json(dto::records_to_json(&records))).into_response()
}

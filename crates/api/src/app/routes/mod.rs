use axum::{
    Router,
    routing::{get, post},
};

pub mod catalog;
pub mod predictions;
pub mod system;

/// Full routing tree for the serving surface.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/search", get(catalog::search))
        .route("/buy", post(catalog::buy))
        .route("/filter", get(catalog::filter))
        .route("/predict_sales", get(predictions::predict_sales))
        .route("/predict_stock", get(predictions::predict_stock))
}

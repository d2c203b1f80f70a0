use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shelfline_core::CoreError;

/// Map a `CoreError` onto the plain-string response shape used by
/// `/search`, `/buy`, and `/filter`.
///
/// Expected business conditions keep the fixed wording the original
/// surface exposed; everything else carries the error's own message.
pub fn plain_error_response(err: CoreError) -> axum::response::Response {
    let (status, message) = match &err {
        CoreError::NotFound => (StatusCode::NOT_FOUND, "Product not available.".to_string()),
        CoreError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, "Not enough stock available.".to_string())
        }
        CoreError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, "Invalid filter option.".to_string()),
        CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (status, Json(json!(message))).into_response()
}

/// Map a `CoreError` onto the `{success: false, message}` envelope used by
/// the prediction endpoints. Always HTTP 200; the envelope carries the
/// outcome, matching the historical contract.
pub fn prediction_failure(err: CoreError) -> axum::response::Response {
    let message = match &err {
        CoreError::NotFound => "Nothing found for this prediction target.".to_string(),
        _ => err.to_string(),
    };
    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}

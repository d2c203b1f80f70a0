use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

pub async fn health() -> axum::response::Response {
    Json(json!({ "status": "ok" })).into_response()
}

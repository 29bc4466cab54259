pub mod combinations;
pub mod common;
pub mod products;
pub mod variants;

use axum::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

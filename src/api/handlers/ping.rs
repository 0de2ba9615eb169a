use axum::Json;
use serde_json::{Value, json};

use crate::api::dto::envelope::ApiResponse;

/// `GET /api/v1/test/ping`
pub async fn ping_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({ "message": "pong" })))
}

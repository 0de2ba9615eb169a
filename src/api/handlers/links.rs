//! Handlers for the caller's own links: history and deletion.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::Value;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::history::{HistoryItem, HistoryMeta, HistoryResponse};
use crate::api::dto::pagination::PageRequest;
use crate::domain::identity::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/url/history?page=1&limit=10`
///
/// `page` defaults to 1 and `limit` to 10; non-numeric or non-positive
/// values fall back to those defaults. `limit` is capped at 1000.
///
/// # Response
///
/// ```json
/// {
///   "status": true,
///   "data": {
///     "history": [
///       {
///         "id": 7,
///         "original_url": "https://example.com",
///         "short_code": "aB3dE_9x",
///         "short_url": "http://localhost:8080/api/v1/url/redirect/aB3dE_9x",
///         "clicks": 3,
///         "created_at": "2026-01-01T00:00:00Z"
///       }
///     ],
///     "meta": { "page": 1, "limit": 10, "count": 1 }
///   }
/// }
/// ```
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<PageRequest>,
) -> Result<Json<ApiResponse<HistoryResponse>>, AppError> {
    let page = params.page();
    let limit = params.limit();

    let links = state.link_service.history(&identity, page, limit).await?;

    let history: Vec<HistoryItem> = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            HistoryItem::from_link(link, short_url)
        })
        .collect();

    let meta = HistoryMeta {
        page,
        limit,
        count: history.len(),
    };

    Ok(Json(ApiResponse::success(HistoryResponse { history, meta })))
}

/// Deletes one of the caller's links together with its click history.
///
/// # Endpoint
///
/// `DELETE /api/v1/url/{code}`
///
/// # Errors
///
/// Returns 400 Bad Request if the code is blank.
/// Returns 404 Not Found if the code does not exist or belongs to someone
/// else.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.link_service.delete_link(&identity, &code).await?;

    Ok(Json(ApiResponse::message("URL deleted successfully")))
}

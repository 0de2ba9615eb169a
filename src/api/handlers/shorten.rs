//! Handler for the link shortening endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::identity::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/v1/url/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// `expires_at` is optional.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "status": true,
///   "data": {
///     "short_code": "aB3dE_9x",
///     "short_url": "http://localhost:8080/api/v1/url/redirect/aB3dE_9x"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a missing or invalid URL.
/// Returns 401 Unauthorized if the bearer token names an unknown user.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ShortenResponse>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(&identity, &payload.original_url, payload.expires_at)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ShortenResponse {
            short_code: link.code,
            short_url,
        })),
    ))
}

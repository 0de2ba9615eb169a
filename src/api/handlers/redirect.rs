//! Handler for short URL redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use crate::api::extractors::RequestOrigin;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/v1/url/redirect/{code}`
///
/// Answers `301 Moved Permanently` with the destination in `Location`.
/// The click is recorded asynchronously; a full click queue never delays
/// or fails the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
/// Returns 410 Gone if the link has expired.
/// Returns 500 if the stored destination cannot be sent as a header.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    RequestOrigin(origin): RequestOrigin,
) -> Result<Response, AppError> {
    let destination = state
        .redirect_service
        .resolve(&code, origin, Utc::now())
        .await?;

    let location = HeaderValue::from_str(&destination).map_err(|e| {
        tracing::error!(code = %code, error = %e, "stored destination is not a valid header value");
        AppError::internal("Invalid redirect target", json!({}))
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
        .into_response())
}

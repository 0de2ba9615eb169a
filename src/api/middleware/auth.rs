//! Bearer token authentication for user-only endpoints.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticated user id, inserted as a request extension by [`layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Requires a valid access token.
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// Unlike the identity middleware there is no guest fallback.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, malformed, or the
/// token fails verification (bad signature, expired, or a refresh token).
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let user_id = st.token_service.verify_access(&token)?;
    parts.extensions.insert(AuthUser { user_id });

    Ok(next.run(Request::from_parts(parts, body)).await)
}

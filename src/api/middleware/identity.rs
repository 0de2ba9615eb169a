//! Identity resolution middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use chrono::Utc;

use crate::{error::AppError, state::AppState};

/// Header carrying the guest session token in both directions.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Resolves the caller and stores it as an [`Identity`](crate::domain::identity::Identity)
/// request extension.
///
/// # Resolution
///
/// 1. A valid `Authorization: Bearer <access token>` identifies a user
/// 2. A live `X-Session-Token` identifies a guest and slides its expiry
/// 3. Anything else gets a brand new guest session
///
/// A bad bearer token is not an error here; the request continues as a
/// guest. Guests always get their token back in `X-Session-Token`, also on
/// error responses, so a client never loses a freshly minted session.
///
/// # Errors
///
/// Returns `500 Internal Server Error` if session storage fails.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let bearer = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);

    let session_token = parts
        .headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    let identity = st
        .identity_service
        .resolve(bearer.as_deref(), session_token, Utc::now())
        .await?;

    let echo = identity
        .session_token()
        .and_then(|token| HeaderValue::from_str(token).ok());

    parts.extensions.insert(identity);
    let mut response = next.run(Request::from_parts(parts, body)).await;

    if let Some(value) = echo {
        response.headers_mut().insert(SESSION_TOKEN_HEADER, value);
    }

    Ok(response)
}

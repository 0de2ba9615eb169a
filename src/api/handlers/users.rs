//! Handlers for user accounts.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::users::{LoginRequest, RefreshRequest, RegisterRequest, UserProfile};
use crate::api::middleware::auth::AuthUser;
use crate::api::middleware::identity::SESSION_TOKEN_HEADER;
use crate::application::services::TokenPair;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /api/v1/user/register`
///
/// ```json
/// { "email": "ann@example.com", "name": "Ann", "password": "secret1" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed email, blank name or a password
/// shorter than 6 characters.
/// Returns 409 Conflict if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .user_service
        .register(&payload.email, &payload.name, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "User registered successfully",
            user.into(),
        )),
    ))
}

/// Exchanges credentials for an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /api/v1/user/login`
///
/// If the request carries `X-Session-Token`, every link created under that
/// guest session becomes owned by the user.
///
/// # Errors
///
/// Returns 401 Unauthorized for unknown emails and wrong passwords alike.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let session_token = headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let pair = state
        .user_service
        .login(&payload.email, &payload.password, session_token)
        .await?;

    Ok(Json(ApiResponse::success(pair)))
}

/// Issues a new token pair from a refresh token.
///
/// # Endpoint
///
/// `POST /api/v1/user/refresh`
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
pub async fn refresh_handler(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let pair = state.user_service.refresh(&payload.refresh_token).await?;

    Ok(Json(ApiResponse::success(pair)))
}

/// Returns the authenticated user's profile.
///
/// # Endpoint
///
/// `GET /api/v1/user/get-user` (bearer token required)
pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(AuthUser { user_id }): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user = state.user_service.get_user(user_id).await?;

    Ok(Json(ApiResponse::success(user.into())))
}

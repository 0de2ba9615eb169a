//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, get_user_handler, history_handler, login_handler, ping_handler,
    redirect_handler, refresh_handler, register_handler, shorten_handler,
};
use crate::api::middleware::{auth, identity};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// Link endpoints. Every request is resolved to a user or guest identity.
///
/// - `POST   /shorten`          - Create a short link
/// - `GET    /redirect/{code}`  - Follow a short link
/// - `GET    /history`          - The caller's links, paginated
/// - `DELETE /{code}`           - Delete one of the caller's links
pub fn url_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/redirect/{code}", get(redirect_handler))
        .route("/history", get(history_handler))
        .route("/{code}", delete(delete_link_handler))
        .route_layer(middleware::from_fn_with_state(state, identity::layer))
}

/// Account endpoints that take credentials in the body.
///
/// - `POST /register`
/// - `POST /login`
/// - `POST /refresh`
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
}

/// Account endpoints that require a bearer access token.
///
/// - `GET /get-user`
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/get-user", get(get_user_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// - `GET /ping`
pub fn test_routes() -> Router<AppState> {
    Router::new().route("/ping", get(ping_handler))
}

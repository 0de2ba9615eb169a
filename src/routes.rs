//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`        - Health check: storage, cache, click queue
//! - `/api/v1/url/*`       - Link endpoints (user or guest identity)
//! - `/api/v1/user/*`      - Account endpoints
//! - `/api/v1/test/ping`   - Liveness probe
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin; exposes `X-Session-Token` to browsers
//! - **Rate limiting** - Per-IP token bucket, stricter on credential endpoints
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::get;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::handlers::health_handler;
use crate::api::middleware::identity::SESSION_TOKEN_HEADER;
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes;
use crate::state::AppState;

/// Assembles the application without rate limiting or path normalization.
///
/// Used by tests, which run without a socket peer address.
pub fn app(state: AppState) -> Router {
    let api = api_v1(&state, false);
    finish(api, state)
}

/// Constructs the production router with all routes and middleware.
///
/// `state.behind_proxy` selects where the rate limiter reads the client IP
/// from; enable it only behind a trusted reverse proxy.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api = api_v1(&state, true);
    NormalizePathLayer::trim_trailing_slash().layer(finish(api, state))
}

fn api_v1(state: &AppState, rate_limited: bool) -> Router<AppState> {
    let mut credentials = routes::credential_routes();
    if rate_limited {
        credentials = rate_limit::apply(credentials, rate_limit::CREDENTIALS, state.behind_proxy);
    }

    let api = Router::new()
        .nest("/url", routes::url_routes(state.clone()))
        .nest("/user", credentials.merge(routes::user_routes(state.clone())))
        .nest("/test", routes::test_routes());

    if rate_limited {
        rate_limit::apply(api, rate_limit::PUBLIC, state.behind_proxy)
    } else {
        api
    }
}

fn finish(api: Router<AppState>, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors_layer())
        .layer(tracing::layer())
}

fn cors_layer() -> CorsLayer {
    let session_header = HeaderName::from_static(SESSION_TOKEN_HEADER);

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            session_header.clone(),
        ])
        .expose_headers([session_header])
}

//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with per-dependency checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: every dependency healthy
/// - **503 Service Unavailable**: at least one dependency failing
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "healthy", "message": "42 links" },
///     "cache": { "status": "healthy", "backend": "redis" },
///     "click_queue": { "status": "healthy", "message": "capacity 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let checks = HealthChecks {
        storage: check_storage(&state).await,
        cache: check_cache(&state).await,
        click_queue: check_click_queue(&state),
    };

    let all_healthy =
        checks.storage.is_healthy() && checks.cache.is_healthy() && checks.click_queue.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.links.count().await {
        Ok(count) => CheckStatus {
            message: Some(format!("{count} links")),
            ..CheckStatus::healthy(None)
        },
        Err(e) => CheckStatus::unhealthy(None, e.to_string()),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = Some(state.cache.backend_name());
    if state.cache.health_check().await {
        CheckStatus::healthy(backend)
    } else {
        CheckStatus::unhealthy(backend, "cache unreachable")
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::unhealthy(None, "click queue is closed")
    } else {
        CheckStatus {
            message: Some(format!("capacity {}", state.click_sender.capacity())),
            ..CheckStatus::healthy(None)
        }
    }
}

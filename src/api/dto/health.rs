//! DTOs for the health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
    pub cache: CheckStatus,
    pub click_queue: CheckStatus,
}

/// Status of one dependency.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn healthy(backend: Option<&'static str>) -> Self {
        Self {
            status: "healthy",
            backend,
            message: None,
        }
    }

    pub fn unhealthy(backend: Option<&'static str>, message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            backend,
            message: Some(message.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
///
/// The URL itself is checked by the link service (absolute, http or https);
/// here we only require that something was sent.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "original_url is required"))]
    pub original_url: String,

    /// Optional expiry. After this instant the link answers 410 Gone.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_expiry_is_optional() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"original_url": "https://example.com"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.expires_at.is_none());

        let req: ShortenRequest = serde_json::from_str(
            r#"{"original_url": "https://example.com", "expires_at": "2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.expires_at.is_some());
    }
}

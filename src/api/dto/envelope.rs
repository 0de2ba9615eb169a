//! Common response envelope.
//!
//! Every JSON response, success or failure, has this shape:
//!
//! ```json
//! {
//!   "status": true,
//!   "message": "optional human-readable text",
//!   "data": { },
//!   "meta": { }
//! }
//! ```
//!
//! Absent fields are omitted rather than serialized as `null`.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            status: true,
            message: None,
            data: Some(data),
            meta: None,
        }
    }

    /// Successful response carrying `data` and a message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: Some(data),
            meta: None,
        }
    }
}

impl ApiResponse<Value> {
    /// Successful response with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: None,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_fields_are_omitted() {
        let body = serde_json::to_value(ApiResponse::message("URL deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({ "status": true, "message": "URL deleted successfully" })
        );
    }

    #[test]
    fn test_success_carries_data() {
        let body = serde_json::to_value(ApiResponse::success(json!({ "short_code": "abc" }))).unwrap();
        assert_eq!(body["status"], true);
        assert_eq!(body["data"]["short_code"], "abc");
        assert!(body.get("message").is_none());
        assert!(body.get("meta").is_none());
    }
}

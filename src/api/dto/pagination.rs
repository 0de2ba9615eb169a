//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;

/// `?page=&limit=` query parameters.
///
/// Parsing is lenient: a value that is missing or not an integer is treated
/// as absent, so a bad query string never fails the request.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageRequest {
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Page number, falling back to 1 when absent or below 1.
    pub fn page(&self) -> i64 {
        match self.page {
            Some(page) if page >= 1 => page,
            _ => DEFAULT_PAGE,
        }
    }

    /// Page size: 10 when absent or below 1, capped at [`MAX_LIMIT`].
    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(limit) if limit >= 1 => limit.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> PageRequest {
        serde_json::from_value(
            serde_json::Value::Object(
                url::form_urlencoded::parse(query.as_bytes())
                    .map(|(k, v)| (k.into_owned(), serde_json::Value::String(v.into_owned())))
                    .collect(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = parse("");
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_explicit_values() {
        let p = parse("page=3&limit=25");
        assert_eq!(p.page(), 3);
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let p = parse("page=0&limit=-1");
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let p = parse("page=abc&limit=ten");
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(parse("limit=5000").limit(), MAX_LIMIT);
        assert_eq!(parse("limit=1000").limit(), 1000);
    }
}

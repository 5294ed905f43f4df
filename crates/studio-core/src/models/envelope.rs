//! Response envelope and list plumbing shared by every resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire envelope wrapping every admin API response.
///
/// Callers only ever see `data`; `code` and `message` surface in errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Discard the envelope and keep the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Body of a non-success response.
///
/// The backend uses either the envelope shape or a bare `detail` string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// The human-readable message, preferring `message` over `detail`.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.detail.filter(|d| !d.is_empty()))
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "list")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Query parameters for list endpoints.
///
/// Passed through to the server untouched; filtering and paging semantics
/// belong to the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Params for a given page.
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Add a free-form filter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_unwraps_to_data() {
        let resp: ApiResponse<Vec<String>> = serde_json::from_value(json!({
            "code": 0,
            "message": "ok",
            "data": ["portrait", "anime"]
        }))
        .unwrap();
        assert_eq!(resp.into_data(), vec!["portrait", "anime"]);
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_value(json!({"message": "quota exceeded", "detail": "x"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("quota exceeded"));

        let body: ErrorBody = serde_json::from_value(json!({"detail": "Not found"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Not found"));

        let body: ErrorBody = serde_json::from_value(json!({"code": 500, "message": ""})).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn list_params_flatten_filters() {
        let params = ListParams::page(2, 50).filter("category", "portrait");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({"page": 2, "page_size": 50, "category": "portrait"})
        );
    }

    #[test]
    fn page_accepts_list_alias() {
        let page: Page<u32> =
            serde_json::from_value(json!({"list": [1, 2], "total": 2})).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page, None);
    }
}

//! Generation template types.

use serde::{Deserialize, Serialize};

/// A generation template as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub credit_cost: Option<i64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
    /// Prompt, model parameters and anything else the backend attaches.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A template category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCategory {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub template_count: Option<u64>,
}

/// Request body for batch updates.
#[derive(Debug, Serialize)]
pub struct BatchUpdateRequest<'a> {
    pub ids: &'a [String],
    pub updates: &'a serde_json::Value,
}

/// Response from batch updates.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchUpdateResult {
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub failed: Vec<String>,
}

/// Response from the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub key: Option<String>,
}

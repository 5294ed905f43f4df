//! Jobs, alerts and the acknowledge/ticket workflow they share.

use serde::{Deserialize, Serialize};

/// A generation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    pub status: String,
    #[serde(default, deserialize_with = "crate::session::optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "crate::session::optional_string_or_number")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An operational alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Aggregate counters for jobs or alerts. Counters are server-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub unacknowledged: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for acknowledging one item.
#[derive(Debug, Serialize)]
pub struct AcknowledgeRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

/// Request body for acknowledging several items.
#[derive(Debug, Serialize)]
pub struct BatchAcknowledgeRequest<'a> {
    pub ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

/// Result of a batch acknowledge.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchAcknowledgeResult {
    #[serde(default)]
    pub acknowledged: u64,
}

/// A ticket to open against a job or alert.
#[derive(Debug, Clone, Serialize)]
pub struct TicketRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// A ticket created by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ticket {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

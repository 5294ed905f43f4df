//! Dashboard and acquisition-attribution analytics types.
//!
//! All numbers are computed server-side; these are display shapes only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub jobs_today: u64,
    #[serde(default)]
    pub failed_jobs_today: u64,
    #[serde(default)]
    pub credits_spent_today: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Query for attribution endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Attribution counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionStats {
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub installs: u64,
    #[serde(default)]
    pub matched: u64,
    #[serde(default)]
    pub match_rate: f64,
    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
}

/// One step of the acquisition funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub name: String,
    pub count: u64,
    #[serde(default)]
    pub conversion_rate: Option<f64>,
}

/// The acquisition funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub steps: Vec<FunnelStep>,
}

/// A fingerprint matching rule: signal weights and acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingRule {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    pub name: String,
    pub weights: BTreeMap<String, f64>,
    pub threshold: f64,
    #[serde(default)]
    pub time_window_hours: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
}

/// Request body for creating a matching rule.
#[derive(Debug, Clone, Serialize)]
pub struct NewMatchingRule {
    pub name: String,
    pub weights: BTreeMap<String, f64>,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_hours: Option<u32>,
}

/// Request body for a matching-rule dry run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchTestRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Web-visit signals (ip, user agent, screen, timezone, ...).
    pub visit: serde_json::Value,
    /// Post-install device signals.
    pub install: serde_json::Value,
}

/// Server-computed outcome of a matching-rule dry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTestResult {
    pub score: f64,
    pub matched: bool,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
}

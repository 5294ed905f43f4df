//! App user types.

use serde::{Deserialize, Serialize};

/// An end user of the mobile app, as seen by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUser {
    #[serde(deserialize_with = "crate::session::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for granting credits.
#[derive(Debug, Serialize)]
pub struct CreditGrantRequest<'a> {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

/// Result of a credit grant: the ledger entry and the new balance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditGrant {
    #[serde(default, deserialize_with = "crate::session::optional_string_or_number")]
    pub transaction_id: Option<String>,
    pub balance: i64,
}

//! The session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::AccessToken;

/// The admin account a session belongs to.
///
/// Only `id` and `email` are interpreted; every other field the server sends
/// is kept in `extra` so it survives a save/load cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier. Numeric ids are normalized to strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Account email.
    pub email: String,
    /// Remaining profile fields (name, role, avatar, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Create a user with no extra profile fields.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Display name, if the server provided one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(|v| v.as_str())
    }
}

/// An authenticated admin session.
///
/// At most one session is live per storage context. A session whose
/// `expires_at` is strictly in the past is treated as absent everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: AccessToken,
    /// The signed-in account.
    pub user: User,
    /// Capability strings, in server order.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Instant after which the session is dead.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session.
    pub fn new(
        token: AccessToken,
        user: User,
        permissions: Vec<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            user,
            permissions,
            expires_at,
        }
    }

    /// True if `expires_at` is strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// True if the session has expired as of the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True if the session carries the given capability.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

pub(crate) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

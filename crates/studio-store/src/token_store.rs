//! The persisted session record.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use studio_core::error::StorageError;
use studio_core::{Result, Session};

use crate::SessionStorage;

/// Storage key of the session record.
pub const SESSION_KEY: &str = "studio_admin_session";

/// Reads and writes the single session record `{token, user, permissions,
/// expires_at}` through a [`SessionStorage`] backend.
#[derive(Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: SessionStorage> TokenStore<S> {
    /// Create a token store over the given backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist `session`, replacing any previous record.
    ///
    /// The token is stored as-is; its shape is not validated.
    #[instrument(skip(self, session), fields(user = %session.user.id))]
    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session).map_err(|e| StorageError::Encode {
            message: e.to_string(),
        })?;
        self.storage.set(SESSION_KEY, &json)?;
        debug!(expires_at = %session.expires_at, "Session saved");
        Ok(())
    }

    /// Read the stored record without any side effect.
    ///
    /// Absent and malformed records both yield `None`. Expiry is not checked.
    pub fn peek(&self) -> Option<Session> {
        let raw = self.storage.get(SESSION_KEY)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed session record");
                None
            }
        }
    }

    /// Read the stored record, enforcing expiry against the current clock.
    ///
    /// See [`TokenStore::load_at`].
    pub fn load(&self) -> Option<Session> {
        self.load_at(Utc::now())
    }

    /// Read the stored record, enforcing expiry against `now`.
    ///
    /// A record whose `expires_at` is strictly before `now` is removed from
    /// storage and reported as absent. This is the storage half of teardown
    /// only; resource clients are torn down by the session manager, which
    /// should be preferred over calling this directly.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.peek()?;
        if session.is_expired_at(now) {
            info!(expires_at = %session.expires_at, "Stored session expired, clearing");
            if let Err(e) = self.clear() {
                warn!(error = %e, "Failed to clear expired session");
            }
            return None;
        }
        Some(session)
    }

    /// Remove the stored record. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY)?;
        debug!("Session record cleared");
        Ok(())
    }
}

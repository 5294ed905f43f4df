//! Session lifecycle: login, expiry enforcement and coordinated teardown.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use studio_core::error::AuthError;
use studio_core::{Credentials, Error, Result, Session};
use studio_store::{SessionStorage, TokenStore};

use crate::auth::AuthClient;
use crate::factory::ApiClientFactory;
use crate::registry::ClientRegistry;

/// Owns the persisted session and the resource clients built from it.
///
/// States are `LoggedOut` (no live record) and `LoggedIn`. While logged in,
/// every registry slot is empty or holds a client built with the current
/// token: login always rebuilds, logout and expiry always clear.
#[derive(Debug)]
pub struct SessionManager<S> {
    store: TokenStore<S>,
    auth: AuthClient,
    registry: Arc<ClientRegistry>,
}

impl<S: SessionStorage> SessionManager<S> {
    /// Create a manager with a fresh registry.
    pub fn new(factory: ApiClientFactory, storage: S) -> Result<Self> {
        let auth = AuthClient::new(&factory)?;
        Ok(Self {
            store: TokenStore::new(storage),
            auth,
            registry: Arc::new(ClientRegistry::new(factory)),
        })
    }

    /// Returns the shared client registry.
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Returns the token store.
    pub fn store(&self) -> &TokenStore<S> {
        &self.store
    }

    /// Returns the auth client.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Log in, persist the session and rebuild every resource client with
    /// the new token.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.auth.login(credentials).await?;

        self.store.save(&session)?;
        if let Err(e) = self.registry.init_all(&session.token) {
            // Never leave a saved session without its clients.
            self.logout()?;
            return Err(e);
        }

        info!(user = %session.user.id, "Logged in");
        Ok(session)
    }

    /// Read the session, enforcing expiry against the current clock.
    ///
    /// See [`SessionManager::load_at`].
    pub fn load(&self) -> Option<Session> {
        self.load_at(Utc::now())
    }

    /// Read the session, enforcing expiry against `now`.
    ///
    /// This read has a side effect: when the stored session expired before
    /// `now`, a full [`logout`](SessionManager::logout) runs (storage and
    /// every resource client) and `None` is returned.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.store.peek()?;
        if session.is_expired_at(now) {
            info!(expires_at = %session.expires_at, "Session expired, tearing down");
            if let Err(e) = self.logout() {
                warn!(error = %e, "Teardown of expired session incomplete");
            }
            return None;
        }
        Some(session)
    }

    /// Load the live session and bind every resource client to it.
    ///
    /// Used at start-up, when the registry is empty but a session survives
    /// in storage.
    pub fn restore(&self) -> Result<Option<Session>> {
        let Some(session) = self.load() else {
            self.registry.clear_all();
            return Ok(None);
        };
        self.registry.init_all(&session.token)?;
        info!(user = %session.user.id, "Session restored");
        Ok(Some(session))
    }

    /// Like [`restore`](SessionManager::restore), but a missing session is
    /// [`AuthError::NoSession`] and an expired one is torn down and reported
    /// as [`AuthError::SessionExpired`].
    pub fn require(&self) -> Result<Session> {
        self.require_at(Utc::now())
    }

    /// [`require`](SessionManager::require) against an explicit clock.
    pub fn require_at(&self, now: DateTime<Utc>) -> Result<Session> {
        let Some(session) = self.store.peek() else {
            self.registry.clear_all();
            return Err(AuthError::NoSession.into());
        };
        if session.is_expired_at(now) {
            info!(expires_at = %session.expires_at, "Session expired, tearing down");
            self.logout()?;
            return Err(AuthError::SessionExpired.into());
        }
        self.registry.init_all(&session.token)?;
        Ok(session)
    }

    /// Clear every resource client and the stored session in one call.
    ///
    /// The registry is always cleared, even when removing the stored record
    /// fails; that failure is returned afterwards. Logging out twice is
    /// not an error.
    pub fn logout(&self) -> Result<()> {
        self.registry.clear_all();
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Check the live session's token against the server.
    ///
    /// Returns `false` without a request when no live session exists.
    pub async fn verify(&self) -> Result<bool> {
        match self.load() {
            Some(session) => self.auth.verify(&session.token).await,
            None => Ok(false),
        }
    }

    /// React to an error from any authenticated call.
    ///
    /// An [`Error::is_unauthenticated`] error means the server revoked the
    /// token, so the session is torn down. Returns whether teardown ran.
    pub fn handle_error(&self, error: &Error) -> Result<bool> {
        if !error.is_unauthenticated() {
            return Ok(false);
        }
        warn!("Token rejected by server, logging out");
        self.logout()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{AccessToken, ApiRoot, ResourceFamily, User};
    use studio_store::{MemoryStorage, SESSION_KEY};

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn manager() -> SessionManager<MemoryStorage> {
        let factory = ApiClientFactory::new(ApiRoot::new("https://api.studio.app").unwrap());
        SessionManager::new(factory, MemoryStorage::new()).unwrap()
    }

    fn session(token: &str, expires_at: &str) -> Session {
        Session::new(
            AccessToken::new(token),
            User::new("u1", "a@b.com"),
            vec!["read".into()],
            at(expires_at),
        )
    }

    #[test]
    fn expired_load_tears_down_everything() {
        let manager = manager();
        manager
            .store()
            .save(&session("t1", "2000-01-01T00:00:00Z"))
            .unwrap();
        manager.registry().init_all(&AccessToken::new("t1")).unwrap();

        assert_eq!(manager.load(), None);
        assert!(manager.store().storage().get(SESSION_KEY).is_none());
        for family in ResourceFamily::ALL {
            assert!(manager.registry().get(family, None).unwrap_err().is_not_initialized());
        }
    }

    #[test]
    fn live_load_leaves_clients_alone() {
        let manager = manager();
        let saved = session("t1", "2099-01-01T00:00:00Z");
        manager.store().save(&saved).unwrap();
        manager.registry().init_all(&saved.token).unwrap();

        assert_eq!(manager.load(), Some(saved));
        assert!(manager.registry().is_initialized(ResourceFamily::Dashboard));
    }

    #[test]
    fn logout_clears_store_and_every_client() {
        let manager = manager();
        manager
            .store()
            .save(&session("t1", "2099-01-01T00:00:00Z"))
            .unwrap();
        manager.registry().init_all(&AccessToken::new("t1")).unwrap();

        manager.logout().unwrap();
        manager.logout().unwrap();

        assert_eq!(manager.load(), None);
        for family in ResourceFamily::ALL {
            assert!(manager.registry().get(family, None).unwrap_err().is_not_initialized());
        }
    }

    #[test]
    fn restore_binds_clients_to_stored_token() {
        let manager = manager();
        manager
            .store()
            .save(&session("t1", "2099-01-01T00:00:00Z"))
            .unwrap();

        let restored = manager.restore().unwrap().unwrap();
        assert_eq!(restored.token, AccessToken::new("t1"));
        for family in ResourceFamily::ALL {
            assert!(manager.registry().is_initialized(family));
        }
    }

    #[test]
    fn restore_without_session_leaves_registry_empty() {
        let manager = manager();
        assert!(manager.restore().unwrap().is_none());
        assert!(!manager.registry().is_initialized(ResourceFamily::Templates));
    }

    #[test]
    fn unauthenticated_error_triggers_logout() {
        let manager = manager();
        manager
            .store()
            .save(&session("t1", "2099-01-01T00:00:00Z"))
            .unwrap();
        manager.registry().init_all(&AccessToken::new("t1")).unwrap();

        let other = Error::from(AuthError::InvalidCredentials);
        assert!(!manager.handle_error(&other).unwrap());
        assert!(manager.load().is_some());

        let revoked = Error::from(AuthError::Unauthenticated);
        assert!(manager.handle_error(&revoked).unwrap());
        assert!(manager.load().is_none());
        assert!(!manager.registry().is_initialized(ResourceFamily::Users));
    }

    #[test]
    fn expiry_checked_against_given_clock() {
        let manager = manager();
        manager
            .store()
            .save(&session("t1", "2030-01-01T00:00:00Z"))
            .unwrap();

        assert!(manager.load_at(at("2029-12-31T23:59:59Z")).is_some());
        assert!(manager.load_at(at("2030-01-01T00:00:01Z")).is_none());
        assert!(manager.store().peek().is_none());
    }

    #[test]
    fn require_distinguishes_missing_and_expired() {
        let manager = manager();
        assert!(matches!(
            manager.require().unwrap_err(),
            Error::Auth(AuthError::NoSession)
        ));

        manager
            .store()
            .save(&session("t1", "2030-01-01T00:00:00Z"))
            .unwrap();
        assert!(manager.require_at(at("2029-06-01T00:00:00Z")).is_ok());
        assert!(manager.registry().is_initialized(ResourceFamily::Alerts));

        assert!(matches!(
            manager.require_at(at("2031-01-01T00:00:00Z")).unwrap_err(),
            Error::Auth(AuthError::SessionExpired)
        ));
        assert!(manager.store().peek().is_none());
        assert!(!manager.registry().is_initialized(ResourceFamily::Alerts));
    }
}

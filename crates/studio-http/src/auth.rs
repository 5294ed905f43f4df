//! Unauthenticated login and token probes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use studio_core::error::{AuthError, TransportError};
use studio_core::{AccessToken, Credentials, Result, Session, User};

use crate::client::ApiClient;
use crate::factory::ApiClientFactory;

/// Lifetime assumed when the login payload carries no expiry.
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Request body for login. Deliberately not `Debug`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Login payload inside the envelope.
#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(alias = "access_token")]
    token: AccessToken,
    user: User,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    /// Seconds until expiry, used when `expires_at` is absent.
    #[serde(default)]
    expires_in: Option<i64>,
}

impl LoginPayload {
    /// Build the session. A relative expiry must be positive and land on a
    /// representable instant.
    fn into_session(self, now: DateTime<Utc>) -> Result<Session> {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => at,
            (None, Some(secs)) => Duration::try_seconds(secs)
                .filter(|ttl| *ttl > Duration::zero())
                .and_then(|ttl| now.checked_add_signed(ttl))
                .ok_or_else(|| TransportError::Decode {
                    message: format!("invalid expires_in in login response: {}", secs),
                })?,
            (None, None) => now + Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        };
        Ok(Session::new(self.token, self.user, self.permissions, expires_at))
    }
}

/// Client for the auth endpoints, the only calls made without a
/// factory-bound token.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Create an auth client for the factory's API root.
    pub fn new(factory: &ApiClientFactory) -> Result<Self> {
        Ok(Self {
            api: factory.build_anonymous()?,
        })
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] when the server answers 401;
    /// - [`studio_core::Error::Remote`] for any other error carrying a message;
    /// - [`TransportError::Decode`] when `expires_in` is not a positive,
    ///   representable duration;
    /// - the transport error, unchanged, otherwise.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        info!("Logging in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let payload: LoginPayload = self
            .api
            .post(&["auth", "login"], &request)
            .await
            .map_err(|e| {
                if e.is_unauthenticated() {
                    AuthError::InvalidCredentials.into()
                } else {
                    e
                }
            })?;

        let session = payload.into_session(Utc::now())?;
        debug!(user = %session.user.id, expires_at = %session.expires_at, "Login succeeded");
        Ok(session)
    }

    /// Probe whether `token` is still accepted.
    ///
    /// Returns `false` on 401; every other failure propagates.
    #[instrument(skip(self, token))]
    pub async fn verify(&self, token: &AccessToken) -> Result<bool> {
        let url = self.api.url_for(&["auth", "verify"])?;
        let request = self.api.http().get(url).bearer_auth(token.as_str());

        match self.api.send::<Option<serde_json::Value>>(request).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthenticated() => {
                debug!("Token rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the account behind `token`.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &AccessToken) -> Result<User> {
        let url = self.api.url_for(&["auth", "me"])?;
        let request = self.api.http().get(url).bearer_auth(token.as_str());
        self.api.send(request).await
    }
}

//! Per-invocation session context.

pub mod storage;

use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};

use studio_core::error::AuthError;
use studio_core::{ApiRoot, Error, Session};
use studio_http::{ApiClientFactory, ClientOptions, ClientRegistry, SessionManager};
use studio_store::FileStorage;

use crate::cli::GlobalArgs;
use crate::output;

/// The session manager for one CLI run, backed by the session file.
pub struct CliContext {
    manager: SessionManager<FileStorage>,
}

impl CliContext {
    /// Build the manager from global options.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let root = ApiRoot::new(&global.api_root).context("Invalid API root")?;
        let options = ClientOptions {
            timeout: global.timeout_secs.map(Duration::from_secs),
            ..ClientOptions::default()
        };

        let manager = SessionManager::new(
            ApiClientFactory::with_options(root, options),
            storage::file_storage()?,
        )
        .context("Failed to set up API clients")?;

        Ok(Self { manager })
    }

    pub fn manager(&self) -> &SessionManager<FileStorage> {
        &self.manager
    }

    pub fn registry(&self) -> &ClientRegistry {
        self.manager.registry()
    }

    /// Restore the stored session and bind every client to it.
    pub fn require_session(&self) -> Result<Session> {
        self.manager.require().map_err(|e| match e {
            Error::Auth(AuthError::NoSession) => {
                anyhow!("No active session. Run 'studio-admin login' first.")
            }
            Error::Auth(AuthError::SessionExpired) => {
                anyhow!("Session expired. Run 'studio-admin login' again.")
            }
            other => anyhow::Error::new(other).context("Failed to restore session"),
        })
    }

    /// Attach context to an API result. A rejected token ends the session.
    pub fn check<T>(&self, result: studio_core::Result<T>, what: &str) -> Result<T> {
        result.or_else(|e| {
            match self.manager.handle_error(&e) {
                Ok(true) => output::warning("Session rejected by server; logged out."),
                Ok(false) => {}
                Err(teardown) => {
                    tracing::warn!(error = %teardown, "Failed to clear rejected session")
                }
            }
            Err(anyhow::Error::new(e).context(what.to_string()))
        })
    }
}

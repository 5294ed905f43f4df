//! App user administration.

use std::sync::Arc;

use tracing::instrument;

use studio_core::models::{AppUser, CreditGrant, CreditGrantRequest, ListParams, Page};
use studio_core::{ResourceFamily, Result};

use crate::registry::{FamilyClient, ResourceClient};

/// Client for `/users`.
#[derive(Debug, Clone)]
pub struct UsersClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for UsersClient {
    const FAMILY: ResourceFamily = ResourceFamily::Users;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

impl UsersClient {
    /// List app users.
    pub async fn list(&self, params: &ListParams) -> Result<Page<AppUser>> {
        self.inner.api().get_with(&[], params).await
    }

    /// Fetch one app user.
    pub async fn get(&self, id: &str) -> Result<AppUser> {
        self.inner.api().get(&[id]).await
    }

    /// Grant (or, with a negative amount, revoke) credits.
    ///
    /// The ledger lives server-side; the returned balance is authoritative.
    #[instrument(skip(self))]
    pub async fn grant_credits(
        &self,
        id: &str,
        amount: i64,
        reason: Option<&str>,
    ) -> Result<CreditGrant> {
        let request = CreditGrantRequest { amount, reason };
        self.inner.api().post(&[id, "credits"], &request).await
    }
}

//! Session-scoped registry of resource clients.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, info};

use studio_core::{AccessToken, Error, ResourceFamily, Result};

use crate::client::ApiClient;
use crate::factory::ApiClientFactory;
use crate::resources::{
    AlertsClient, AttributionClient, DashboardClient, JobsClient, TemplatesClient, UsersClient,
};

/// A client for one resource family, bound to the token it was built with.
#[derive(Debug)]
pub struct ResourceClient {
    family: ResourceFamily,
    api: ApiClient,
}

impl ResourceClient {
    /// Returns the family this client serves.
    pub fn family(&self) -> ResourceFamily {
        self.family
    }

    /// Returns the underlying HTTP client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

/// A typed view over a [`ResourceClient`] of a fixed family.
pub trait FamilyClient: Sized {
    /// The family this view serves.
    const FAMILY: ResourceFamily;

    /// Wrap a shared resource client.
    fn from_resource(resource: Arc<ResourceClient>) -> Self;

    /// Returns the shared resource client.
    fn resource(&self) -> &Arc<ResourceClient>;
}

/// One client per resource family, built once and reused until cleared.
///
/// A registry belongs to one application root and is shared by reference
/// (usually `Arc`). Each family slot is either empty or holds a client
/// built with the token current at the time of its `init`.
#[derive(Debug)]
pub struct ClientRegistry {
    factory: ApiClientFactory,
    clients: RwLock<HashMap<ResourceFamily, Arc<ResourceClient>>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    pub fn new(factory: ApiClientFactory) -> Self {
        Self {
            factory,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the factory clients are built with.
    pub fn factory(&self) -> &ApiClientFactory {
        &self.factory
    }

    fn construct(&self, family: ResourceFamily, token: &AccessToken) -> Result<Arc<ResourceClient>> {
        let api = self.factory.build(token, family)?;
        Ok(Arc::new(ResourceClient { family, api }))
    }

    /// (Re)build the client for `family` bound to `token`, replacing any
    /// existing one.
    pub fn init(&self, family: ResourceFamily, token: &AccessToken) -> Result<Arc<ResourceClient>> {
        let client = self.construct(family, token)?;
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(family, Arc::clone(&client));
        debug!(%family, "Resource client initialized");
        Ok(client)
    }

    /// Returns the client for `family`.
    ///
    /// An existing client is returned as-is (the token argument is ignored).
    /// When none exists, one is built from `token`. With neither, fails with
    /// [`Error::NotInitialized`].
    pub fn get(
        &self,
        family: ResourceFamily,
        token: Option<&AccessToken>,
    ) -> Result<Arc<ResourceClient>> {
        if let Some(client) = self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&family)
        {
            return Ok(Arc::clone(client));
        }

        let Some(token) = token else {
            error!(%family, "Resource client requested before initialization");
            return Err(Error::NotInitialized { family });
        };

        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot between the two locks.
        if let Some(client) = clients.get(&family) {
            return Ok(Arc::clone(client));
        }
        let client = self.construct(family, token)?;
        clients.insert(family, Arc::clone(&client));
        debug!(%family, "Resource client constructed lazily");
        Ok(client)
    }

    /// Drop the client for `family`. The next `get` without a token fails.
    pub fn clear(&self, family: ResourceFamily) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&family);
        debug!(%family, "Resource client cleared");
    }

    /// Rebuild every family with `token` in one locked step.
    ///
    /// Either every slot is replaced or, if any client fails to build, the
    /// registry is left empty.
    pub fn init_all(&self, token: &AccessToken) -> Result<()> {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.clear();

        let mut fresh = HashMap::with_capacity(ResourceFamily::ALL.len());
        for family in ResourceFamily::ALL {
            fresh.insert(family, self.construct(family, token)?);
        }
        *clients = fresh;

        info!("All resource clients initialized");
        Ok(())
    }

    /// Drop every client in one locked step.
    pub fn clear_all(&self) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        info!("All resource clients cleared");
    }

    /// True if a client is currently held for `family`.
    pub fn is_initialized(&self, family: ResourceFamily) -> bool {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&family)
    }

    /// Typed access to a family client. See [`ClientRegistry::get`].
    pub fn client<C: FamilyClient>(&self, token: Option<&AccessToken>) -> Result<C> {
        self.get(C::FAMILY, token).map(C::from_resource)
    }

    /// Templates client.
    pub fn templates(&self, token: Option<&AccessToken>) -> Result<TemplatesClient> {
        self.client(token)
    }

    /// Users client.
    pub fn users(&self, token: Option<&AccessToken>) -> Result<UsersClient> {
        self.client(token)
    }

    /// Jobs client.
    pub fn jobs(&self, token: Option<&AccessToken>) -> Result<JobsClient> {
        self.client(token)
    }

    /// Alerts client.
    pub fn alerts(&self, token: Option<&AccessToken>) -> Result<AlertsClient> {
        self.client(token)
    }

    /// Attribution analytics client.
    pub fn attribution(&self, token: Option<&AccessToken>) -> Result<AttributionClient> {
        self.client(token)
    }

    /// Dashboard client.
    pub fn dashboard(&self, token: Option<&AccessToken>) -> Result<DashboardClient> {
        self.client(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::ApiRoot;

    fn registry() -> ClientRegistry {
        ClientRegistry::new(ApiClientFactory::new(
            ApiRoot::new("https://api.studio.app").unwrap(),
        ))
    }

    #[test]
    fn get_without_token_fails_when_empty() {
        let registry = registry();
        for family in ResourceFamily::ALL {
            let err = registry.get(family, None).unwrap_err();
            assert!(err.is_not_initialized());
        }
    }

    #[test]
    fn lazy_get_is_identity_stable() {
        let registry = registry();
        let token = AccessToken::new("tokenA");

        let first = registry.get(ResourceFamily::Templates, Some(&token)).unwrap();
        let second = registry.get(ResourceFamily::Templates, None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn init_replaces_existing_client() {
        let registry = registry();
        let a = registry
            .init(ResourceFamily::Jobs, &AccessToken::new("tokenA"))
            .unwrap();
        let b = registry
            .init(ResourceFamily::Jobs, &AccessToken::new("tokenB"))
            .unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        let current = registry.get(ResourceFamily::Jobs, None).unwrap();
        assert!(Arc::ptr_eq(&current, &b));
    }

    #[test]
    fn clear_only_affects_one_family() {
        let registry = registry();
        registry.init_all(&AccessToken::new("t")).unwrap();

        registry.clear(ResourceFamily::Alerts);
        assert!(!registry.is_initialized(ResourceFamily::Alerts));
        assert!(registry.is_initialized(ResourceFamily::Jobs));
    }

    #[test]
    fn clear_all_empties_every_slot() {
        let registry = registry();
        registry.init_all(&AccessToken::new("t")).unwrap();
        for family in ResourceFamily::ALL {
            assert!(registry.is_initialized(family));
        }

        registry.clear_all();
        for family in ResourceFamily::ALL {
            assert!(registry.get(family, None).unwrap_err().is_not_initialized());
        }
    }

    #[test]
    fn failed_init_all_leaves_registry_empty() {
        let registry = registry();
        registry.init_all(&AccessToken::new("good")).unwrap();

        assert!(registry.init_all(&AccessToken::new("bad\r\n")).is_err());
        for family in ResourceFamily::ALL {
            assert!(!registry.is_initialized(family));
        }
    }

    #[test]
    fn typed_accessors_share_the_slot() {
        let registry = registry();
        let token = AccessToken::new("t");
        let templates = registry.templates(Some(&token)).unwrap();
        let again = registry.templates(None).unwrap();
        assert!(Arc::ptr_eq(templates.resource(), again.resource()));
        assert_eq!(templates.resource().family(), ResourceFamily::Templates);
    }
}

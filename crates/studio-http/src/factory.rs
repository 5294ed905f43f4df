//! Builds token-bound clients for resource families.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use studio_core::error::InvalidInputError;
use studio_core::{AccessToken, ApiRoot, ResourceFamily, Result};

use crate::client::{ApiClient, ClientOptions, transport_error};

/// Configures [`ApiClient`]s for an API root. Performs no I/O.
#[derive(Debug, Clone)]
pub struct ApiClientFactory {
    root: ApiRoot,
    options: ClientOptions,
}

impl ApiClientFactory {
    /// Create a factory with default transport options.
    pub fn new(root: ApiRoot) -> Self {
        Self::with_options(root, ClientOptions::default())
    }

    /// Create a factory with explicit transport options.
    pub fn with_options(root: ApiRoot, options: ClientOptions) -> Self {
        Self { root, options }
    }

    /// Returns the API root.
    pub fn root(&self) -> &ApiRoot {
        &self.root
    }

    /// Build a client for `family` bound to `token`.
    ///
    /// The base URL is `<root>/api/v1/admin<family path>`. The
    /// `Authorization: Bearer` and JSON content-type headers are fixed at
    /// construction; the client never sees a later token.
    pub fn build(&self, token: &AccessToken, family: ResourceFamily) -> Result<ApiClient> {
        let mut auth =
            HeaderValue::from_str(&token.bearer()).map_err(|_| InvalidInputError::Token)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = self
            .options
            .builder()
            .default_headers(headers)
            .build()
            .map_err(transport_error)?;

        ApiClient::new(http, &self.root.admin_url(family.base_path()))
    }

    /// Build the unauthenticated client rooted at `<root>/api/v1/admin`.
    pub(crate) fn build_anonymous(&self) -> Result<ApiClient> {
        let http = self.options.builder().build().map_err(transport_error)?;
        ApiClient::new(http, &self.root.admin_url(""))
    }
}

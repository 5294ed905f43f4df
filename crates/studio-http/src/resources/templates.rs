//! Template management.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use studio_core::models::{
    BatchUpdateRequest, BatchUpdateResult, ListParams, Page, Template, TemplateCategory,
    UploadedFile,
};
use studio_core::{ResourceFamily, Result};

use crate::client::transport_error;
use crate::registry::{FamilyClient, ResourceClient};

/// Client for `/templates`.
#[derive(Debug, Clone)]
pub struct TemplatesClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for TemplatesClient {
    const FAMILY: ResourceFamily = ResourceFamily::Templates;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

impl TemplatesClient {
    /// List templates.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Template>> {
        self.inner.api().get_with(&[], params).await
    }

    /// Fetch one template.
    pub async fn get(&self, id: &str) -> Result<Template> {
        self.inner.api().get(&[id]).await
    }

    /// Create a template from a JSON definition.
    #[instrument(skip(self, template))]
    pub async fn create(&self, template: &serde_json::Value) -> Result<Template> {
        self.inner.api().post(&[], template).await
    }

    /// Replace fields of a template.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: &serde_json::Value) -> Result<Template> {
        self.inner.api().put(&[id], changes).await
    }

    /// Delete a template.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.inner.api().delete(&[id]).await
    }

    /// List template categories.
    pub async fn categories(&self) -> Result<Vec<TemplateCategory>> {
        self.inner.api().get(&["categories"]).await
    }

    /// Upload a preview asset. Storage is handled by the backend; the
    /// returned URL is what templates reference.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(transport_error)?;
        let form = Form::new().part("file", part);
        self.inner.api().post_multipart(&["upload"], form).await
    }

    /// Apply the same changes to several templates.
    #[instrument(skip(self, updates), fields(count = ids.len()))]
    pub async fn batch_update(
        &self,
        ids: &[String],
        updates: &serde_json::Value,
    ) -> Result<BatchUpdateResult> {
        let request = BatchUpdateRequest { ids, updates };
        self.inner.api().post(&["batch-update"], &request).await
    }

    /// Copy a template; returns the new copy.
    pub async fn duplicate(&self, id: &str) -> Result<Template> {
        self.inner.api().post_empty(&[id, "duplicate"]).await
    }
}

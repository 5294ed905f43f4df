//! Jobs and alerts, and the acknowledge/ticket workflow they share.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use studio_core::models::{
    AcknowledgeRequest, Alert, BatchAcknowledgeRequest, BatchAcknowledgeResult, Job, ListParams,
    Page, Ticket, TicketRequest, TriageStats,
};
use studio_core::{ResourceFamily, Result};

use crate::registry::{FamilyClient, ResourceClient};

/// Acknowledge and escalate items of a resource family.
///
/// The same endpoints exist under `/jobs` and `/alerts`; only the family
/// (and so the base path) differs.
#[async_trait]
pub trait Triage: Send + Sync {
    /// Returns the resource client the workflow runs against.
    fn triage_resource(&self) -> &ResourceClient;

    /// Aggregate counters for the family.
    async fn stats(&self) -> Result<TriageStats> {
        self.triage_resource().api().get(&["stats"]).await
    }

    /// Mark one item as seen.
    async fn acknowledge(&self, id: &str, note: Option<&str>) -> Result<()> {
        let request = AcknowledgeRequest { note };
        let _: Option<serde_json::Value> = self
            .triage_resource()
            .api()
            .post(&[id, "acknowledge"], &request)
            .await?;
        Ok(())
    }

    /// Mark several items as seen.
    async fn acknowledge_batch(
        &self,
        ids: &[String],
        note: Option<&str>,
    ) -> Result<BatchAcknowledgeResult> {
        let request = BatchAcknowledgeRequest { ids, note };
        self.triage_resource()
            .api()
            .post(&["acknowledge-batch"], &request)
            .await
    }

    /// Open a ticket for one item.
    async fn create_ticket(&self, id: &str, ticket: &TicketRequest) -> Result<Ticket> {
        self.triage_resource()
            .api()
            .post(&[id, "ticket"], ticket)
            .await
    }
}

/// Client for `/jobs`.
#[derive(Debug, Clone)]
pub struct JobsClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for JobsClient {
    const FAMILY: ResourceFamily = ResourceFamily::Jobs;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

impl JobsClient {
    /// List jobs.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &ListParams) -> Result<Page<Job>> {
        self.inner.api().get_with(&[], params).await
    }

    /// Fetch one job.
    pub async fn get(&self, id: &str) -> Result<Job> {
        self.inner.api().get(&[id]).await
    }
}

#[async_trait]
impl Triage for JobsClient {
    fn triage_resource(&self) -> &ResourceClient {
        &self.inner
    }
}

/// Client for `/alerts`.
#[derive(Debug, Clone)]
pub struct AlertsClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for AlertsClient {
    const FAMILY: ResourceFamily = ResourceFamily::Alerts;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

impl AlertsClient {
    /// List alerts.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &ListParams) -> Result<Page<Alert>> {
        self.inner.api().get_with(&[], params).await
    }

    /// Fetch one alert.
    pub async fn get(&self, id: &str) -> Result<Alert> {
        self.inner.api().get(&[id]).await
    }
}

#[async_trait]
impl Triage for AlertsClient {
    fn triage_resource(&self) -> &ResourceClient {
        &self.inner
    }
}

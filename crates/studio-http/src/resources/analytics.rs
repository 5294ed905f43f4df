//! Dashboard and acquisition-attribution analytics.
//!
//! Every figure is aggregated server-side. Matching rules are stored and
//! scored by the backend; `test_rule` is a round trip, not a local preview.

use std::sync::Arc;

use tracing::instrument;

use studio_core::models::{
    AttributionQuery, AttributionStats, DashboardSummary, Funnel, MatchTestRequest,
    MatchTestResult, MatchingRule, NewMatchingRule,
};
use studio_core::{ResourceFamily, Result};

use crate::registry::{FamilyClient, ResourceClient};

/// Client for `/dashboard`.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for DashboardClient {
    const FAMILY: ResourceFamily = ResourceFamily::Dashboard;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

impl DashboardClient {
    /// Headline numbers.
    pub async fn summary(&self) -> Result<DashboardSummary> {
        self.inner.api().get(&["summary"]).await
    }
}

/// Client for `/attribution`.
#[derive(Debug, Clone)]
pub struct AttributionClient {
    inner: Arc<ResourceClient>,
}

impl FamilyClient for AttributionClient {
    const FAMILY: ResourceFamily = ResourceFamily::Attribution;

    fn from_resource(resource: Arc<ResourceClient>) -> Self {
        Self { inner: resource }
    }

    fn resource(&self) -> &Arc<ResourceClient> {
        &self.inner
    }
}

const MATCHING_RULES: &str = "matching-rules";

impl AttributionClient {
    /// Visit/install/match counters.
    #[instrument(skip(self))]
    pub async fn stats(&self, query: &AttributionQuery) -> Result<AttributionStats> {
        self.inner.api().get_with(&["stats"], query).await
    }

    /// Acquisition funnel.
    #[instrument(skip(self))]
    pub async fn funnel(&self, query: &AttributionQuery) -> Result<Funnel> {
        self.inner.api().get_with(&["funnel"], query).await
    }

    /// All matching rules.
    pub async fn rules(&self) -> Result<Vec<MatchingRule>> {
        self.inner.api().get(&[MATCHING_RULES]).await
    }

    /// The rule currently in effect, if any.
    pub async fn active_rule(&self) -> Result<Option<MatchingRule>> {
        self.inner.api().get(&[MATCHING_RULES, "active"]).await
    }

    /// Store a new (inactive) rule.
    #[instrument(skip(self, rule), fields(name = %rule.name))]
    pub async fn create_rule(&self, rule: &NewMatchingRule) -> Result<MatchingRule> {
        self.inner.api().post(&[MATCHING_RULES], rule).await
    }

    /// Make `id` the active rule.
    pub async fn activate_rule(&self, id: &str) -> Result<MatchingRule> {
        self.inner
            .api()
            .post_empty(&[MATCHING_RULES, id, "activate"])
            .await
    }

    /// Score a visit/install pair with a rule (the active one when
    /// `rule_id` is unset).
    #[instrument(skip(self, request))]
    pub async fn test_rule(&self, request: &MatchTestRequest) -> Result<MatchTestResult> {
        self.inner
            .api()
            .post(&[MATCHING_RULES, "test"], request)
            .await
    }
}

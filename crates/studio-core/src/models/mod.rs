//! Wire models for admin API payloads.
//!
//! Shapes keep unknown fields in `extra` maps where the backend is known to
//! attach more than the toolkit interprets.

mod attribution;
mod envelope;
mod template;
mod triage;
mod user;

pub use attribution::{
    AttributionQuery, AttributionStats, DashboardSummary, Funnel, FunnelStep, MatchTestRequest,
    MatchTestResult, MatchingRule, NewMatchingRule,
};
pub use envelope::{ApiResponse, ErrorBody, ListParams, Page};
pub use template::{BatchUpdateRequest, BatchUpdateResult, Template, TemplateCategory, UploadedFile};
pub use triage::{
    AcknowledgeRequest, Alert, BatchAcknowledgeRequest, BatchAcknowledgeResult, Job, Ticket,
    TicketRequest, TriageStats,
};
pub use user::{AppUser, CreditGrant, CreditGrantRequest};

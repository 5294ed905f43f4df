//! Typed clients, one per resource family.

mod analytics;
mod templates;
mod triage;
mod users;

pub use analytics::{AttributionClient, DashboardClient};
pub use templates::TemplatesClient;
pub use triage::{AlertsClient, JobsClient, Triage};
pub use users::UsersClient;

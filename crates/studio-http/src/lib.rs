//! studio-http - HTTP clients and session lifecycle for the studio admin API.
//!
//! [`SessionManager`] turns credentials into a persisted [`Session`] and a
//! [`ClientRegistry`] of per-family clients bound to its token; logging out
//! or hitting expiry tears both down together.
//!
//! # Example
//!
//! ```no_run
//! use studio_core::{ApiRoot, Credentials};
//! use studio_core::models::ListParams;
//! use studio_http::{ApiClientFactory, SessionManager};
//! use studio_store::MemoryStorage;
//!
//! # async fn example() -> Result<(), studio_core::Error> {
//! let factory = ApiClientFactory::new(ApiRoot::new("https://api.studio.app")?);
//! let manager = SessionManager::new(factory, MemoryStorage::new())?;
//!
//! manager.login(&Credentials::new("ops@studio.app", "secret")).await?;
//! let templates = manager.registry().templates(None)?;
//! let page = templates.list(&ListParams::page(1, 20)).await?;
//! println!("{} templates", page.total);
//!
//! manager.logout()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Session`]: studio_core::Session

mod auth;
mod client;
mod factory;
mod manager;
mod registry;
pub mod resources;

pub use auth::AuthClient;
pub use client::{ApiClient, ClientOptions};
pub use factory::ApiClientFactory;
pub use manager::SessionManager;
pub use registry::{ClientRegistry, FamilyClient, ResourceClient};
pub use resources::{
    AlertsClient, AttributionClient, DashboardClient, JobsClient, TemplatesClient, Triage,
    UsersClient,
};

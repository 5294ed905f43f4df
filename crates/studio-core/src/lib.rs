//! studio-core - Core types for the studio admin API toolkit.
//!
//! Everything here is transport-agnostic: the session record, the opaque
//! bearer token, resource families, wire models and the unified error type.

pub mod credentials;
pub mod error;
pub mod models;
pub mod session;
pub mod tokens;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use session::{Session, User};
pub use tokens::AccessToken;
pub use types::{ApiRoot, ResourceFamily};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

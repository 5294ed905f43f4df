//! Core addressing types.
//!
//! These types enforce their invariants at construction time.

mod api_root;
mod family;

pub use api_root::{ADMIN_PREFIX, ApiRoot};
pub use family::ResourceFamily;

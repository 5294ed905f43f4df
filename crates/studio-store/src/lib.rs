//! studio-store - Session storage for the studio admin toolkit.
//!
//! [`SessionStorage`] is the key/value seam the session record is written
//! through. [`TokenStore`] owns the record layout and the expiry rule.

mod file;
mod memory;
mod token_store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use token_store::{SESSION_KEY, TokenStore};

use studio_core::Result;

/// A string key/value store scoped to one client context.
///
/// Reads are infallible from the caller's point of view: a backend that
/// cannot read a key reports it as absent.
pub trait SessionStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

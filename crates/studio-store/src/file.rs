//! Filesystem-backed session storage.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, warn};

use studio_core::Result;
use studio_core::error::{Error, StorageError};

use crate::SessionStorage;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(path: &Path, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Storage keeping one file per key under a directory.
///
/// Writes and removals hold an exclusive lock on a sibling `.lock` file so
/// two processes sharing a data directory never interleave. Values are
/// written to a temporary file and renamed into place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory is created lazily.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert a key into a filesystem-safe file stem.
    fn file_stem(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", Self::file_stem(key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.lock", Self::file_stem(key)))
    }

    /// Run `f` while holding the exclusive lock for `key`.
    fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.root).map_err(|e| map_io(&self.root, e))?;

        let lock_path = self.lock_path(key);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;
        lock.lock_exclusive().map_err(|e| map_io(&lock_path, e))?;

        let result = f();

        if let Err(e) = FileExt::unlock(&lock) {
            warn!(error = %e, path = %lock_path.display(), "Failed to release storage lock");
        }
        result
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Unreadable session file, treating as absent");
                None
            }
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_lock(key, || {
            let path = self.value_path(key);
            let tmp = path.with_extension("json.tmp");

            {
                let mut file = fs::File::create(&tmp).map_err(|e| map_io(&tmp, e))?;

                // Restrict before the secret hits the disk (Unix only)
                #[cfg(unix)]
                {
                    let mut perms = file.metadata().map_err(|e| map_io(&tmp, e))?.permissions();
                    perms.set_mode(0o600);
                    fs::set_permissions(&tmp, perms).map_err(|e| map_io(&tmp, e))?;
                }

                file.write_all(value.as_bytes())
                    .map_err(|e| map_io(&tmp, e))?;
                file.sync_all().map_err(|e| map_io(&tmp, e))?;
            }

            fs::rename(&tmp, &path).map_err(|e| map_io(&path, e))?;
            debug!(path = %path.display(), "Stored value");
            Ok(())
        })
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(());
        }

        self.with_lock(key, || match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&path, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_values() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.get("studio_admin_session").is_none());
        storage.set("studio_admin_session", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get("studio_admin_session").as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn set_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("k", "first").unwrap();
        storage.set("k", "second").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("second"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.remove("k").unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").is_none());
    }

    #[test]
    fn keys_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("../escape", "v").unwrap();
        assert!(dir.path().join("___escape.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn files_are_private() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("k", "secret").unwrap();

        let mode = fs::metadata(dir.path().join("k.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

//! Where the CLI keeps its session record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use studio_store::FileStorage;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STUDIO_DATA_DIR";

/// Get the data directory holding the session file.
fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let dirs = ProjectDirs::from("", "", "studio-admin")
        .context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// File storage rooted at the data directory.
pub fn file_storage() -> Result<FileStorage> {
    Ok(FileStorage::new(data_dir()?))
}

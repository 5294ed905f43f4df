//! Stamps `STUDIO_ADMIN_VERSION` for `studio-admin --version`.
//!
//! Release packaging sets `STUDIO_ADMIN_BUILD_VERSION` explicitly. Local
//! builds use the crate version with the short commit appended
//! (`0.1.0+g1a2b3c4`, plus `.dirty` for uncommitted changes).

use std::path::PathBuf;
use std::process::Command;

const OVERRIDE_ENV: &str = "STUDIO_ADMIN_BUILD_VERSION";

fn main() {
    println!("cargo:rerun-if-env-changed={}", OVERRIDE_ENV);

    // The crate sits two levels below the workspace root
    let git_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../.git");
    println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
    println!("cargo:rerun-if-changed={}", git_dir.join("index").display());

    let version = match std::env::var(OVERRIDE_ENV) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => local_version(),
    };

    println!("cargo:rustc-env=STUDIO_ADMIN_VERSION={}", version);
}

fn local_version() -> String {
    let base = env!("CARGO_PKG_VERSION");
    match git(&["rev-parse", "--short", "HEAD"]) {
        Some(sha) => {
            let dirty = git(&["status", "--porcelain"]).is_some();
            format!("{}+g{}{}", base, sha, if dirty { ".dirty" } else { "" })
        }
        None => base.to_string(),
    }
}

/// Trimmed stdout of a successful git command; `None` on failure or empty output.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

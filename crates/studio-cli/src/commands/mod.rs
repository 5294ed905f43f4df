//! Command implementations.

pub mod analytics;
pub mod auth;
pub mod templates;
pub mod triage;
pub mod users;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read a JSON document from a file, or from stdin when `path` is `-`.
pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read JSON from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    let value: serde_json::Value = serde_json::from_str(&raw).context("Invalid JSON")?;
    if !value.is_object() {
        bail!("Expected a JSON object");
    }
    Ok(value)
}

/// Parse `key=value` pairs given as repeated flags.
pub(crate) fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .with_context(|| format!("Expected key=value, got '{}'", pair))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_split_on_first_equals() {
        let pairs = parse_pairs(&["tier=pro".into(), "q=a=b".into()]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("tier".to_string(), "pro".to_string()),
                ("q".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn pairs_reject_missing_key() {
        assert!(parse_pairs(&["novalue".into()]).is_err());
        assert!(parse_pairs(&["=x".into()]).is_err());
    }

    #[test]
    fn json_must_be_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");

        std::fs::write(&path, r#"{"name": "Anime"}"#).unwrap();
        assert_eq!(read_json(&path).unwrap()["name"], "Anime");

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(read_json(&path).is_err());
    }
}

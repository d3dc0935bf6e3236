//! JSON file primitives

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ids become file names, so only a conservative alphabet is accepted.
pub(crate) fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(crate) fn record_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Read one record; `None` when the file does not exist.
pub(crate) async fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write to a temp file first, then rename over the record.
pub(crate) async fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_vec_pretty(value)?;
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &content).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Remove a record; `false` when it was already gone.
pub(crate) async fn remove(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Every parsable record in a directory. Corrupt files are logged and skipped
/// so one bad record can't take a whole listing down.
pub(crate) async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut out = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(out),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read::<T>(&path).await {
            Ok(Some(record)) => out.push(record),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable record: {}", e),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_ids() {
        assert!(is_safe_id("3f2a9c1e-7b7d-4c53-9a57-0d4f1c7e2b11"));
        assert!(is_safe_id("legacy_chat"));
        assert!(!is_safe_id(""));
        assert!(!is_safe_id("../etc/passwd"));
        assert!(!is_safe_id("a/b"));
        assert!(!is_safe_id("a.json"));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = record_path(dir.path(), "one");

        write(&path, &serde_json::json!({"n": 1})).await.unwrap();
        let back: Option<serde_json::Value> = read(&path).await.unwrap();
        assert_eq!(back.unwrap()["n"], 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let back: Option<serde_json::Value> = read(&record_path(dir.path(), "nope")).await.unwrap();
        assert!(back.is_none());
        assert!(!remove(&record_path(dir.path(), "nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_all_skips_corrupt_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        write(&record_path(dir.path(), "good"), &serde_json::json!({"ok": true}))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("bad.json"), b"{not json").await.unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), b"hello").await.unwrap();

        let all: Vec<serde_json::Value> = read_all(dir.path()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["ok"], true);
    }
}

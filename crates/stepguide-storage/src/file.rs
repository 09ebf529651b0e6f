//! Atomic JSON file persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// A JSON document on disk that is replaced atomically.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the target, so a reader never sees a half-written document. Callers
/// serialize writers themselves.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    tmp_path: PathBuf,
    corrupt_path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        let mut corrupt_name = tmp_name.clone();
        tmp_name.push(".tmp");
        corrupt_name.push(".corrupt");
        let tmp_path = path.with_file_name(tmp_name);
        let corrupt_path = path.with_file_name(corrupt_name);
        Self {
            path,
            tmp_path,
            corrupt_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing or blank file is `None`.
    pub async fn load<T: DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))
    }

    /// Read the document, falling back to `None` when it cannot be used.
    ///
    /// An unparseable document is moved to `<name>.corrupt` so the next
    /// persist starts from a clean slate without losing the old bytes.
    pub async fn load_or_reset<T: DeserializeOwned>(&self) -> Option<T> {
        match self.load().await {
            Ok(value) => value,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(
                    error = %e,
                    moved_to = %self.corrupt_path.display(),
                    "Discarding unreadable store document"
                );
                if let Err(e) = fs::rename(&self.path, &self.corrupt_path).await {
                    warn!(path = %self.path.display(), error = %e, "Failed to move corrupt document aside");
                }
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read store document, starting empty");
                None
            }
        }
    }

    /// Replace the document with `value`.
    pub async fn persist<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(value)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::persist(&self.path, e))?;
        }

        self.write_tmp(&body)
            .await
            .map_err(|e| StoreError::persist(&self.path, e))?;

        if let Err(e) = fs::rename(&self.tmp_path, &self.path).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(StoreError::persist(&self.path, e));
        }

        debug!(path = %self.path.display(), bytes = body.len(), "Persisted JSON document");
        Ok(())
    }

    async fn write_tmp(&self, body: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(&self.tmp_path).await?;
        file.write_all(body).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("absent.json"));
        let loaded: Option<Value> = file.load().await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_persist_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("nested").join("doc.json"));

        file.persist(&json!({"a": 1})).await.unwrap();
        file.persist(&json!({"b": 2})).await.unwrap();

        let loaded: Option<Value> = file.load().await.unwrap();
        assert_eq!(loaded, Some(json!({"b": 2})));
        assert!(!dir.path().join("nested").join("doc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{not json").unwrap();

        let file = JsonFile::new(&path);
        let err = file.load::<Value>().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{trunc").unwrap();

        let file = JsonFile::new(&path);
        let loaded: Option<Value> = file.load_or_reset().await;
        assert!(loaded.is_none());
        assert!(!path.exists());
        assert_eq!(std::fs::read(dir.path().join("doc.json.corrupt")).unwrap(), b"{trunc");

        file.persist(&json!({"ok": true})).await.unwrap();
        let loaded: Option<Value> = file.load_or_reset().await;
        assert_eq!(loaded, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_blank_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"  \n").unwrap();

        let loaded: Option<Value> = JsonFile::new(&path).load().await.unwrap();
        assert!(loaded.is_none());
    }
}

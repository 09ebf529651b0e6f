//! Single-slot store: only the latest received guide is kept.

use std::path::PathBuf;

use async_trait::async_trait;
use stepguide_models::{GuideArtifact, GuideId};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::StoreResult;
use crate::file::JsonFile;
use crate::store::{GuideStore, StoreMode};

/// Keeps exactly one guide, replaced wholesale on every write.
///
/// The file holds the bare `{guide_id, steps}` document.
pub struct SingleSlotStore {
    file: JsonFile,
    slot: RwLock<Option<GuideArtifact>>,
}

impl SingleSlotStore {
    /// Open the store, loading the guide already on disk if there is one.
    ///
    /// A document that cannot be read leaves the store empty.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let file = JsonFile::new(path);
        let slot: Option<GuideArtifact> = file.load_or_reset().await;

        info!(
            path = %file.path().display(),
            guide_id = ?slot.as_ref().map(|a| a.guide_id.value()),
            "Opened single-slot guide store"
        );

        Ok(Self {
            file,
            slot: RwLock::new(slot),
        })
    }
}

#[async_trait]
impl GuideStore for SingleSlotStore {
    fn mode(&self) -> StoreMode {
        StoreMode::SingleSlot
    }

    async fn write(&self, artifact: GuideArtifact) -> StoreResult<()> {
        // Held across the file write so memory and disk never disagree.
        let mut slot = self.slot.write().await;
        self.file.persist(&artifact).await?;
        *slot = Some(artifact);
        Ok(())
    }

    async fn latest(&self) -> Option<GuideArtifact> {
        self.slot.read().await.clone()
    }

    async fn get(&self, guide_id: GuideId) -> Option<GuideArtifact> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|artifact| artifact.guide_id == guide_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stepguide_models::Step;

    fn artifact(id: i64, steps: u32) -> GuideArtifact {
        let steps = (1..=steps)
            .map(|i| Step::new(i, i * 5, format!("Frame {}", i), format!("https://img.test/{}/{}.jpg", id, i)))
            .collect();
        GuideArtifact::new(GuideId(id), steps)
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SingleSlotStore::open(dir.path().join("received.json")).await.unwrap();
        assert!(store.latest().await.is_none());
        assert!(store.get(GuideId(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_guide() {
        let dir = tempfile::tempdir().unwrap();
        let store = SingleSlotStore::open(dir.path().join("received.json")).await.unwrap();

        store.write(artifact(42, 3)).await.unwrap();
        assert_eq!(store.get(GuideId(42)).await, Some(artifact(42, 3)));

        store.write(artifact(43, 2)).await.unwrap();
        assert!(store.get(GuideId(42)).await.is_none());
        assert_eq!(store.get(GuideId(43)).await, Some(artifact(43, 2)));
        assert_eq!(store.latest().await.map(|a| a.guide_id), Some(GuideId(43)));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("received.json");

        {
            let store = SingleSlotStore::open(&path).await.unwrap();
            store.write(artifact(7, 3)).await.unwrap();
        }

        let reopened = SingleSlotStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(GuideId(7)).await, Some(artifact(7, 3)));

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["guide_id"], 7);
        assert_eq!(on_disk["steps"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_unparseable_file_starts_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("received.json");
        std::fs::write(&path, br#"{"guide_id":"42","steps":[]}"#).unwrap();

        let store = SingleSlotStore::open(&path).await.unwrap();
        assert!(store.latest().await.is_none());
        assert!(dir.path().join("received.json.corrupt").exists());

        store.write(artifact(42, 2)).await.unwrap();
        let reopened = SingleSlotStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(GuideId(42)).await, Some(artifact(42, 2)));
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_previous_guide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("received.json");
        let store = SingleSlotStore::open(&path).await.unwrap();
        store.write(artifact(1, 1)).await.unwrap();

        // A directory squatting on the temp path makes the next persist fail.
        std::fs::create_dir(dir.path().join("received.json.tmp")).unwrap();

        assert!(store.write(artifact(2, 1)).await.is_err());
        assert_eq!(store.latest().await, Some(artifact(1, 1)));
    }

    #[tokio::test]
    async fn test_concurrent_writes_never_mix() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SingleSlotStore::open(dir.path().join("received.json")).await.unwrap());

        let mut handles = Vec::new();
        for id in 1..=20i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.write(artifact(id, (id % 4 + 1) as u32)).await.unwrap();
                store.latest().await
            }));
        }

        for handle in handles {
            let seen = handle.await.unwrap().expect("a guide was written");
            let id = seen.guide_id.value();
            assert_eq!(seen, artifact(id, (id % 4 + 1) as u32));
        }

        let last = store.latest().await.unwrap();
        let reopened = SingleSlotStore::open(dir.path().join("received.json")).await.unwrap();
        assert_eq!(reopened.latest().await, Some(last));
    }
}

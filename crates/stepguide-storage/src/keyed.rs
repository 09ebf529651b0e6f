//! Keyed store: one guide per guide id.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stepguide_models::{GuideArtifact, GuideId};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::StoreResult;
use crate::file::JsonFile;
use crate::store::{GuideStore, StoreMode};

/// On-disk layout of the keyed store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyedDocument {
    #[serde(default)]
    latest: Option<GuideId>,
    #[serde(default)]
    guides: Vec<GuideArtifact>,
}

#[derive(Debug, Clone, Default)]
struct KeyedState {
    latest: Option<GuideId>,
    guides: BTreeMap<GuideId, GuideArtifact>,
}

impl KeyedState {
    fn to_document(&self) -> KeyedDocument {
        KeyedDocument {
            latest: self.latest,
            guides: self.guides.values().cloned().collect(),
        }
    }
}

impl From<KeyedDocument> for KeyedState {
    fn from(doc: KeyedDocument) -> Self {
        let guides = doc
            .guides
            .into_iter()
            .map(|artifact| (artifact.guide_id, artifact))
            .collect();
        Self {
            latest: doc.latest,
            guides,
        }
    }
}

/// Keeps the latest guide for every guide id, so different guides coexist.
pub struct KeyedStore {
    file: JsonFile,
    state: RwLock<KeyedState>,
}

impl KeyedStore {
    /// Open the store, loading guides already on disk.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let file = JsonFile::new(path);
        let state: KeyedState = file
            .load_or_reset::<KeyedDocument>()
            .await
            .map(KeyedState::from)
            .unwrap_or_default();

        info!(
            path = %file.path().display(),
            guides = state.guides.len(),
            "Opened keyed guide store"
        );

        Ok(Self {
            file,
            state: RwLock::new(state),
        })
    }

    /// Number of stored guides.
    pub async fn len(&self) -> usize {
        self.state.read().await.guides.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.guides.is_empty()
    }
}

#[async_trait]
impl GuideStore for KeyedStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Keyed
    }

    async fn write(&self, artifact: GuideArtifact) -> StoreResult<()> {
        let mut state = self.state.write().await;

        let mut next = state.clone();
        next.latest = Some(artifact.guide_id);
        next.guides.insert(artifact.guide_id, artifact);

        self.file.persist(&next.to_document()).await?;
        *state = next;
        Ok(())
    }

    async fn latest(&self) -> Option<GuideArtifact> {
        let state = self.state.read().await;
        state.latest.and_then(|id| state.guides.get(&id).cloned())
    }

    async fn get(&self, guide_id: GuideId) -> Option<GuideArtifact> {
        self.state.read().await.guides.get(&guide_id).cloned()
    }
}

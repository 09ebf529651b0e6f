//! Store trait and construction.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use stepguide_models::{GuideArtifact, GuideId};

use crate::error::{StoreError, StoreResult};
use crate::keyed::KeyedStore;
use crate::single_slot::SingleSlotStore;

/// How received guides are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Only the most recently received guide survives
    #[default]
    SingleSlot,
    /// One guide per guide id
    Keyed,
}

impl StoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreMode::SingleSlot => "single",
            StoreMode::Keyed => "keyed",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StoreMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single_slot" | "single-slot" => Ok(StoreMode::SingleSlot),
            "keyed" => Ok(StoreMode::Keyed),
            other => Err(StoreError::InvalidMode(other.to_string())),
        }
    }
}

/// Durable storage for received guides.
///
/// Every `write` is atomic with respect to readers: a concurrent read sees
/// either the previous state or the new one. Ordering between concurrent
/// writers is unspecified.
#[async_trait]
pub trait GuideStore: Send + Sync {
    fn mode(&self) -> StoreMode;

    /// Persist a received guide. On error the previous state is kept.
    async fn write(&self, artifact: GuideArtifact) -> StoreResult<()>;

    /// The most recently written guide, if any.
    async fn latest(&self) -> Option<GuideArtifact>;

    /// The stored guide for `guide_id`, if this store currently holds one.
    async fn get(&self, guide_id: GuideId) -> Option<GuideArtifact>;
}

/// Open the store for `mode` backed by the file at `path`, loading any existing state.
pub async fn open_store(mode: StoreMode, path: impl Into<PathBuf>) -> StoreResult<Arc<dyn GuideStore>> {
    let store: Arc<dyn GuideStore> = match mode {
        StoreMode::SingleSlot => Arc::new(SingleSlotStore::open(path).await?),
        StoreMode::Keyed => Arc::new(KeyedStore::open(path).await?),
    };
    Ok(store)
}

//! Guide lookup by id.

use std::sync::Arc;

use stepguide_models::{GuideArtifact, GuideId};
use stepguide_storage::{GuideStore, StoreMode};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Read-only view over the receiver store.
#[derive(Clone)]
pub struct GuideQuery {
    store: Arc<dyn GuideStore>,
}

impl GuideQuery {
    pub fn new(store: Arc<dyn GuideStore>) -> Self {
        Self { store }
    }

    /// The stored guide for `guide_id`, or `NotFound` when the store holds
    /// nothing or holds a different guide.
    pub async fn lookup(&self, guide_id: GuideId) -> ApiResult<GuideArtifact> {
        let found = self.store.get(guide_id).await;
        metrics::record_guide_lookup(found.is_some());

        match found {
            Some(artifact) => Ok(artifact),
            None if self.store.mode() == StoreMode::SingleSlot && self.store.latest().await.is_none() => {
                Err(ApiError::not_found("No data received yet"))
            }
            None => {
                debug!(guide_id = %guide_id, "Guide not in store");
                Err(ApiError::not_found("Guide not found"))
            }
        }
    }

    /// Look up a guide by its path segment. Ids that are not numbers are never found.
    pub async fn lookup_raw(&self, raw_id: &str) -> ApiResult<GuideArtifact> {
        match raw_id.parse::<GuideId>() {
            Ok(guide_id) => self.lookup(guide_id).await,
            Err(_) => {
                metrics::record_guide_lookup(false);
                Err(ApiError::not_found("Guide not found"))
            }
        }
    }
}

//! Application state.

use std::sync::Arc;

use stepguide_callback::{CallbackConfig, CallbackDispatcher};
use stepguide_processing::{GuideProcessor, PlaceholderProcessor};
use stepguide_storage::{open_store, GuideStore};

use crate::config::{ApiConfig, ReceiverConfig};
use crate::gateway::{SubmissionGateway, SubmissionPolicy};
use crate::query::GuideQuery;

/// Shared state of the submission service.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub gateway: Arc<SubmissionGateway>,
}

impl AppState {
    /// Create state with the placeholder processor.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let processor = Arc::new(PlaceholderProcessor::new(config.frame_image_base_url.clone()));
        let callbacks = CallbackDispatcher::new(CallbackConfig {
            timeout: config.callback_timeout,
        })?;
        Ok(Self::with_processor(config, processor, callbacks))
    }

    /// Create state around a specific processor.
    pub fn with_processor(
        config: ApiConfig,
        processor: Arc<dyn GuideProcessor>,
        callbacks: CallbackDispatcher,
    ) -> Self {
        let policy = SubmissionPolicy {
            max_upload_bytes: config.max_upload_bytes,
            strict_video_url: config.strict_video_url,
        };
        let gateway = Arc::new(SubmissionGateway::new(processor, callbacks, policy));
        Self { config, gateway }
    }
}

/// Shared state of the receiver service.
#[derive(Clone)]
pub struct ReceiverState {
    pub config: ReceiverConfig,
    pub store: Arc<dyn GuideStore>,
    pub query: GuideQuery,
}

impl ReceiverState {
    /// Open the configured store and build state around it.
    pub async fn new(config: ReceiverConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = open_store(config.store_mode, config.store_path.clone()).await?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: ReceiverConfig, store: Arc<dyn GuideStore>) -> Self {
        let query = GuideQuery::new(Arc::clone(&store));
        Self { config, store, query }
    }
}

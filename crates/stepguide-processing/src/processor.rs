//! Processor strategy trait.

use async_trait::async_trait;
use stepguide_models::{GuideArtifact, GuideId, SubmissionRequest, VideoSource};

use crate::error::ProcessingResult;

/// Input handed to a processor: the guide to build and the video to build it from.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub guide_id: GuideId,
    pub source: VideoSource,
}

impl ProcessingJob {
    pub fn new(guide_id: GuideId, source: VideoSource) -> Self {
        Self { guide_id, source }
    }
}

impl From<SubmissionRequest> for ProcessingJob {
    fn from(request: SubmissionRequest) -> Self {
        Self {
            guide_id: request.guide_id,
            source: request.video_source,
        }
    }
}

/// Builds a guide from a video.
///
/// Callers may not assume anything about latency or determinism beyond
/// "returns an artifact or fails".
#[async_trait]
pub trait GuideProcessor: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn process(&self, job: ProcessingJob) -> ProcessingResult<GuideArtifact>;
}

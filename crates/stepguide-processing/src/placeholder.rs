//! Deterministic placeholder processor.
//!
//! Ignores the video entirely and returns the same three frames for every
//! guide. Useful until a decoder-backed processor is wired in.

use async_trait::async_trait;
use stepguide_models::GuideArtifact;
use tracing::debug;

use crate::error::ProcessingResult;
use crate::processor::{GuideProcessor, ProcessingJob};
use crate::sampler::FrameSampler;

/// Number of frames in every placeholder guide.
const PLACEHOLDER_FRAMES: usize = 3;

/// Nominal video length the placeholder pretends to sample.
const PLACEHOLDER_DURATION_SECS: u32 = 15;

/// Returns a fixed 3-step guide (frames at 5s, 10s and 15s) for any input.
#[derive(Debug, Clone)]
pub struct PlaceholderProcessor {
    sampler: FrameSampler,
    image_base_url: String,
}

impl PlaceholderProcessor {
    /// Create a placeholder whose frame images live under `image_base_url`.
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            sampler: FrameSampler::default(),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn image_url(&self, index: u32) -> String {
        format!("{}/img{}.jpg", self.image_base_url, index)
    }
}

impl Default for PlaceholderProcessor {
    fn default() -> Self {
        Self::new("http://example.com")
    }
}

#[async_trait]
impl GuideProcessor for PlaceholderProcessor {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn process(&self, job: ProcessingJob) -> ProcessingResult<GuideArtifact> {
        debug!(
            guide_id = %job.guide_id,
            source = job.source.kind(),
            "Building placeholder guide"
        );

        let steps = self.sampler.sample(
            PLACEHOLDER_DURATION_SECS,
            PLACEHOLDER_FRAMES,
            |index, _| self.image_url(index),
        )?;

        let artifact = GuideArtifact::new(job.guide_id, steps);
        artifact.validate()?;
        Ok(artifact)
    }
}

//! Submission gateway: validated request in, guide out, webhook fired.

pub mod form;
pub mod validation;

use std::sync::Arc;
use std::time::Instant;

use stepguide_callback::CallbackDispatcher;
use stepguide_models::{GuideArtifact, SubmissionRequest};
use stepguide_processing::{GuideProcessor, ProcessingJob};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

pub use form::SubmissionForm;
pub use validation::{resolve, SubmissionPolicy};

/// Runs one processing job per submission and hands the result to the webhook.
pub struct SubmissionGateway {
    processor: Arc<dyn GuideProcessor>,
    callbacks: CallbackDispatcher,
    policy: SubmissionPolicy,
}

impl SubmissionGateway {
    pub fn new(
        processor: Arc<dyn GuideProcessor>,
        callbacks: CallbackDispatcher,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            processor,
            callbacks,
            policy,
        }
    }

    /// Validate raw fields and submit them.
    pub async fn submit_form(&self, form: SubmissionForm) -> ApiResult<GuideArtifact> {
        let request = match resolve(form, &self.policy) {
            Ok(request) => request,
            Err(e) => {
                metrics::record_submission("unknown", e.status_code().as_u16());
                return Err(e);
            }
        };
        self.submit(request).await
    }

    /// Process a validated submission.
    ///
    /// The webhook is dispatched in the background; its outcome never
    /// affects the returned guide.
    pub async fn submit(&self, request: SubmissionRequest) -> ApiResult<GuideArtifact> {
        let source = request.video_source.kind();
        let guide_id = request.guide_id;
        let callback_url = request.callback_url.clone();
        let start = Instant::now();

        info!(guide_id = %guide_id, source, processor = self.processor.name(), "Processing submission");

        let artifact = match self.run(ProcessingJob::from(request)).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(guide_id = %guide_id, error = %e, "Processing failed");
                metrics::record_submission(source, e.status_code().as_u16());
                return Err(e);
            }
        };

        metrics::record_processing_duration(self.processor.name(), start.elapsed().as_secs_f64());
        metrics::record_submission(source, 200);

        self.callbacks.dispatch(callback_url, artifact.clone());

        info!(guide_id = %guide_id, steps = artifact.len(), "Submission processed");
        Ok(artifact)
    }

    async fn run(&self, job: ProcessingJob) -> ApiResult<GuideArtifact> {
        let expected = job.guide_id;
        let artifact = self.processor.process(job).await?;

        artifact
            .validate()
            .map_err(|e| ApiError::internal(format!("processor returned an invalid guide: {}", e)))?;
        if artifact.guide_id != expected {
            return Err(ApiError::internal(format!(
                "processor returned guide {} for guide {}",
                artifact.guide_id, expected
            )));
        }

        Ok(artifact)
    }
}

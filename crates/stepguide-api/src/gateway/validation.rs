//! Input-mode resolution and submission validation.

use stepguide_models::{GuideId, SubmissionRequest, UploadedFile, VideoSource};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::gateway::form::SubmissionForm;

/// Limits applied to every submission.
#[derive(Debug, Clone)]
pub struct SubmissionPolicy {
    pub max_upload_bytes: usize,
    pub strict_video_url: bool,
}

/// Turn raw fields into a [`SubmissionRequest`].
///
/// An uploaded file selects upload mode even when `video_url` is also
/// present; a plain-text `file` field does the same. Field errors (422) are
/// reported before upload errors (400).
pub fn resolve(form: SubmissionForm, policy: &SubmissionPolicy) -> ApiResult<SubmissionRequest> {
    let SubmissionForm {
        file,
        file_field,
        video_url,
        guide_id,
        callback_url,
    } = form;

    let pending = match (file, file_field) {
        (Some(upload), _) => PendingSource::Upload(upload),
        (None, Some(reference)) => PendingSource::Reference(reference),
        (None, None) => {
            let video_url = video_url.ok_or_else(|| ApiError::validation("video_url is required"))?;
            PendingSource::Remote(video_url.trim().to_string())
        }
    };

    let guide_id: GuideId = guide_id
        .ok_or_else(|| ApiError::validation("guide_id is required"))?
        .parse()
        .map_err(|e: stepguide_models::InvalidGuideId| ApiError::validation(e.to_string()))?;

    let callback_url = callback_url
        .map(|url| url.trim().to_string())
        .ok_or_else(|| ApiError::validation("callback_url is required"))?;

    let video_source = match pending {
        PendingSource::Upload(upload) => {
            check_upload(&upload, policy)?;
            VideoSource::FileUpload(upload)
        }
        PendingSource::Reference(reference) => VideoSource::FileReference(reference),
        PendingSource::Remote(video_url) => {
            if policy.strict_video_url {
                check_video_url(&video_url)?;
            }
            VideoSource::RemoteUrl(video_url)
        }
    };

    Ok(SubmissionRequest {
        guide_id,
        callback_url,
        video_source,
    })
}

enum PendingSource {
    Upload(UploadedFile),
    Reference(String),
    Remote(String),
}

fn check_upload(upload: &UploadedFile, policy: &SubmissionPolicy) -> ApiResult<()> {
    if upload.size() > policy.max_upload_bytes {
        return Err(ApiError::upload("File too large"));
    }
    if !upload.is_allowed_video() {
        return Err(ApiError::upload("Only video files are allowed"));
    }
    Ok(())
}

fn check_video_url(video_url: &str) -> ApiResult<()> {
    let parsed = Url::parse(video_url)
        .map_err(|e| ApiError::validation(format!("video_url is not a valid URL: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        scheme => Err(ApiError::validation(format!(
            "video_url must be an http(s) URL, got scheme '{}'",
            scheme
        ))),
    }
}

//! Video submission handler.

use axum::extract::{Request, State};
use axum::Json;
use stepguide_models::GuideArtifact;

use crate::auth::BearerAuth;
use crate::error::ApiResult;
use crate::gateway::SubmissionForm;
use crate::state::AppState;

/// `POST /process-video`
///
/// Accepts multipart `{file, guide_id, callback_url}` or JSON/form
/// `{video_url, guide_id, callback_url}`. The auth extractor runs before the
/// body is touched.
pub async fn process_video(
    State(state): State<AppState>,
    _auth: BearerAuth,
    request: Request,
) -> ApiResult<Json<GuideArtifact>> {
    let form = SubmissionForm::from_request(request).await?;
    let artifact = state.gateway.submit_form(form).await?;
    Ok(Json(artifact))
}

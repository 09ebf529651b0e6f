//! Receiver handlers: webhook receipt and guide lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use stepguide_models::GuideArtifact;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::ReceiverState;

#[derive(Serialize)]
pub struct ReceivedResponse {
    pub status: &'static str,
}

/// `POST /callbacks/steps`
///
/// Persists the delivered guide as-is. Persistence failures are a 500 and
/// leave the previously stored guide untouched.
pub async fn receive_steps(
    State(state): State<ReceiverState>,
    payload: Result<Json<GuideArtifact>, JsonRejection>,
) -> ApiResult<Json<ReceivedResponse>> {
    let Json(artifact) =
        payload.map_err(|e| ApiError::bad_request(format!("Invalid guide payload: {}", e.body_text())))?;
    let guide_id = artifact.guide_id;
    let steps = artifact.len();

    if let Err(e) = state.store.write(artifact).await {
        error!(guide_id = %guide_id, error = %e, "Failed to store received guide");
        metrics::record_guide_received("failed");
        return Err(e.into());
    }

    metrics::record_guide_received("stored");
    info!(guide_id = %guide_id, steps, mode = %state.store.mode(), "Stored received guide");

    Ok(Json(ReceivedResponse { status: "received" }))
}

/// `GET /guides/:id` and `GET /callbacks/guides/:id`
pub async fn get_guide(
    State(state): State<ReceiverState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GuideArtifact>> {
    let artifact = state.query.lookup_raw(&id).await?;
    Ok(Json(artifact))
}

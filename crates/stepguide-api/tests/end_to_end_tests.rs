//! Submission service delivering into a live receiver.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use stepguide_models::{GuideArtifact, GuideId};
use stepguide_storage::StoreMode;
use tower::ServiceExt;

use common::*;

async fn wait_for_guide(state: &stepguide_api::ReceiverState, guide_id: GuideId) -> Option<GuideArtifact> {
    for _ in 0..100 {
        if let Some(guide) = state.store.get(guide_id).await {
            return Some(guide);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    None
}

#[tokio::test]
async fn test_submission_lands_in_receiver() {
    let (receiver, _dir) = receiver_state(StoreMode::SingleSlot).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = receiver_app(receiver.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let callback_url = format!("http://{}/callbacks/steps", addr);

    let submissions = submission_app(api_config());

    let response = submissions
        .clone()
        .oneshot(json_request(
            Some(TOKEN),
            &json!({"video_url": "http://example.com/a.mp4", "guide_id": "42", "callback_url": callback_url}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let returned: GuideArtifact = serde_json::from_value(json_body(response).await).unwrap();

    let stored = wait_for_guide(&receiver, GuideId(42)).await.expect("guide 42 delivered");
    assert_eq!(stored, returned);

    let response = receiver_app(receiver.clone()).oneshot(get("/guides/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = submissions
        .oneshot(json_request(
            Some(TOKEN),
            &json!({"video_url": "http://example.com/b.mp4", "guide_id": "43", "callback_url": callback_url}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(wait_for_guide(&receiver, GuideId(43)).await.is_some());
    assert!(receiver.store.get(GuideId(42)).await.is_none());

    let response = receiver_app(receiver).oneshot(get("/guides/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

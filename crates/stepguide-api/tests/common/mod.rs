//! Shared fixtures for the HTTP tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use stepguide_api::{create_receiver_router, create_router, ApiConfig, AppState, ReceiverConfig, ReceiverState};
use stepguide_callback::{CallbackConfig, CallbackDispatcher};
use stepguide_processing::PlaceholderProcessor;
use stepguide_storage::{open_store, StoreMode};
use tempfile::TempDir;

pub const TOKEN: &str = "test-import-token";
pub const BOUNDARY: &str = "stepguide-test-boundary";

pub fn api_config() -> ApiConfig {
    ApiConfig {
        import_token: TOKEN.to_string(),
        max_upload_bytes: 64,
        callback_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

pub fn submission_app(config: ApiConfig) -> Router {
    let processor = Arc::new(PlaceholderProcessor::new(config.frame_image_base_url.clone()));
    let callbacks = CallbackDispatcher::new(CallbackConfig {
        timeout: config.callback_timeout,
    })
    .unwrap();
    create_router(AppState::with_processor(config, processor, callbacks), None)
}

/// Receiver state over a store in a fresh temp dir. Keep the dir alive for the test.
pub async fn receiver_state(mode: StoreMode) -> (ReceiverState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ReceiverConfig {
        store_path: dir.path().join("received.json"),
        store_mode: mode,
        ..Default::default()
    };
    let store = open_store(mode, config.store_path.clone()).await.unwrap();
    (ReceiverState::with_store(config, store), dir)
}

pub fn receiver_app(state: ReceiverState) -> Router {
    create_receiver_router(state, None)
}

/// One multipart part: `(name, filename, content type, body)`.
pub type Part<'a> = (&'a str, Option<&'a str>, Option<&'a str>, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", name).as_bytes(),
            ),
        }
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/process-video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn json_request(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/process-video")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

//! Webhook HTTP client.

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use stepguide_models::GuideArtifact;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{CallbackError, CallbackResult};

const DELIVERIES_TOTAL: &str = "stepguide_callback_deliveries_total";
const DELIVERY_DURATION_SECONDS: &str = "stepguide_callback_delivery_duration_seconds";

/// Configuration for webhook delivery.
#[derive(Debug, Clone)]
pub struct CallbackConfig {
    /// Upper bound for one delivery, connection included
    pub timeout: Duration,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl CallbackConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(
                std::env::var("CALLBACK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Delivers guides to caller-supplied webhook URLs.
///
/// One attempt per guide, no retries.
#[derive(Clone)]
pub struct CallbackDispatcher {
    http: Client,
    config: CallbackConfig,
}

impl CallbackDispatcher {
    pub fn new(config: CallbackConfig) -> CallbackResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CallbackError::Network)?;

        Ok(Self { http, config })
    }

    /// POST `artifact` as JSON to `callback_url` and wait for the answer.
    pub async fn deliver(&self, callback_url: &str, artifact: &GuideArtifact) -> CallbackResult<()> {
        if callback_url.trim().is_empty() {
            return Err(CallbackError::MissingUrl);
        }

        let body = serde_json::to_vec(artifact)?;
        debug!(callback_url = %callback_url, bytes = body.len(), "Posting guide to callback");

        let response = self
            .http
            .post(callback_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CallbackError::Rejected { status, body });
        }

        Ok(())
    }

    /// Deliver on a background task and return immediately.
    ///
    /// Failures are logged and counted, never returned. The handle is only
    /// useful for tests and shutdown; dropping it does not cancel delivery.
    pub fn dispatch(&self, callback_url: String, artifact: GuideArtifact) -> JoinHandle<()> {
        let dispatcher = self.clone();

        tokio::spawn(async move {
            let start = Instant::now();
            let guide_id = artifact.guide_id;
            let result = dispatcher.deliver(&callback_url, &artifact).await;
            let elapsed = start.elapsed();

            histogram!(DELIVERY_DURATION_SECONDS).record(elapsed.as_secs_f64());

            match result {
                Ok(()) => {
                    counter!(DELIVERIES_TOTAL, "outcome" => "delivered").increment(1);
                    info!(
                        guide_id = %guide_id,
                        callback_url = %callback_url,
                        duration_ms = %elapsed.as_millis(),
                        "Callback delivered"
                    );
                }
                Err(e) => {
                    counter!(DELIVERIES_TOTAL, "outcome" => e.kind()).increment(1);
                    warn!(
                        guide_id = %guide_id,
                        callback_url = %callback_url,
                        error = %e,
                        "Callback failed"
                    );
                }
            }
        })
    }

    fn classify(&self, error: reqwest::Error) -> CallbackError {
        if error.is_timeout() {
            CallbackError::Timeout(self.config.timeout.as_millis())
        } else {
            CallbackError::Network(error)
        }
    }
}

//! Callback delivery error types.

use thiserror::Error;

pub type CallbackResult<T> = Result<T, CallbackError>;

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Callback URL is empty")]
    MissingUrl,

    #[error("Callback endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Timeout after {0} ms")]
    Timeout(u128),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CallbackError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CallbackError::MissingUrl => "missing_url",
            CallbackError::Rejected { .. } => "rejected",
            CallbackError::Timeout(_) => "timeout",
            CallbackError::Network(_) => "network",
            CallbackError::Json(_) => "json",
        }
    }
}

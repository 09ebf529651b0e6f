//! Processing error types.

use stepguide_models::ArtifactError;
use thiserror::Error;

pub type ProcessingResult<T> = Result<T, ProcessingError>;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Frame sampling failed: {0}")]
    Sampling(String),

    #[error("Invalid guide artifact: {0}")]
    InvalidArtifact(#[from] ArtifactError),
}

impl ProcessingError {
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }
}

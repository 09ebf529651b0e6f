//! Shared data models for the StepGuide services.
//!
//! This crate provides Serde-serializable types for:
//! - Guide identifiers, steps and guide artifacts
//! - Video submissions (uploaded file or remote URL)

pub mod guide;
pub mod submission;

// Re-export common types
pub use guide::{ArtifactError, GuideArtifact, GuideId, InvalidGuideId, Step};
pub use submission::{
    SubmissionRequest, UploadedFile, VideoSource, ALLOWED_VIDEO_EXTENSIONS,
    ALLOWED_VIDEO_MIME_TYPES,
};

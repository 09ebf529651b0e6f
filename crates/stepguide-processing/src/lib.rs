//! Guide processing strategies.
//!
//! A processor turns a submitted video into a [`GuideArtifact`]. The
//! submission service only depends on the [`GuideProcessor`] trait, so the
//! placeholder shipped here can be swapped for a decoder-backed sampler.
//!
//! [`GuideArtifact`]: stepguide_models::GuideArtifact

pub mod error;
pub mod placeholder;
pub mod processor;
pub mod sampler;

pub use error::{ProcessingError, ProcessingResult};
pub use placeholder::PlaceholderProcessor;
pub use processor::{GuideProcessor, ProcessingJob};
pub use sampler::{format_frame_title, FrameSampler};

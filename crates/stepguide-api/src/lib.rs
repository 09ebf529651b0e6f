//! StepGuide HTTP services.
//!
//! This crate provides:
//! - The submission service: bearer-gated `POST /process-video` accepting an
//!   uploaded video or a video URL, answering with the generated guide and
//!   forwarding it to the caller's webhook
//! - The receiver service: webhook endpoint persisting delivered guides and
//!   read-only guide lookups
//! - Security headers, request ids and Prometheus metrics for both

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ReceiverConfig};
pub use error::{ApiError, ApiResult};
pub use gateway::{SubmissionForm, SubmissionGateway, SubmissionPolicy};
pub use query::GuideQuery;
pub use routes::{create_receiver_router, create_router};
pub use state::{AppState, ReceiverState};

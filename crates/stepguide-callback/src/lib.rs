//! Webhook delivery of finished guides.
//!
//! The submission service hands every guide it returns to a
//! [`CallbackDispatcher`], which POSTs it to the caller's webhook on a
//! background task. Delivery outcomes are only visible in logs and metrics.

pub mod client;
pub mod error;

pub use client::{CallbackConfig, CallbackDispatcher};
pub use error::{CallbackError, CallbackResult};

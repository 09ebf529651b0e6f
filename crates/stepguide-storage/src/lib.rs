//! Durable store for guides received over the webhook.
//!
//! This crate provides:
//! - A single-slot store that keeps only the latest received guide
//! - A keyed store that keeps one guide per guide id
//! - Atomic JSON file persistence shared by both

pub mod error;
pub mod file;
pub mod keyed;
pub mod single_slot;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use keyed::KeyedStore;
pub use single_slot::SingleSlotStore;
pub use store::{open_store, GuideStore, StoreMode};

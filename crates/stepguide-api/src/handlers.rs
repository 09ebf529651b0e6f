//! Request handlers.

pub mod callbacks;
pub mod health;
pub mod process;

pub use callbacks::*;
pub use health::*;
pub use process::*;

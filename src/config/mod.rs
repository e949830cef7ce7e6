//! Configuration model for aladin.
//!
//! This module defines the Config struct that represents `aladin.yaml`.
//! Every field is optional; unknown fields are kept so a round-trip through
//! `aladin init --force` does not drop settings from newer versions.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{InferenceProfile, PromptInput};

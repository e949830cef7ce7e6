//! Inference: turning a rendered prompt into a raw model reply.
//!
//! The pipeline only sees the [`InferenceCaller`] trait. The shipped caller
//! runs an external command per request:
//!
//! - Command template variable substitution
//! - Prompt delivered on stdin or as a file
//! - Configurable timeout with process termination
//! - Reply and stderr captured to the run directory
//! - Environment variable merging

mod executor;

pub use executor::{COMMAND_VARIABLES, CommandInference, InferenceRun, ModelSettings};

use crate::error::Result;
use crate::prompt::RenderedPrompt;
use crate::reply::RawReply;

/// Anything that can answer a prompt.
///
/// Implementations return `AladinError::Inference` when no reply was
/// produced. A reply that exists but is malformed is still `Ok`; the parser
/// deals with it.
pub trait InferenceCaller {
    fn complete(&self, prompt: &RenderedPrompt) -> Result<RawReply>;
}

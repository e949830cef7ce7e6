//! Error types for aladin.
//!
//! Uses thiserror for derive macros. Each variant maps to a process exit code
//! so the CLI can report failures without inspecting messages.
//!
//! Parsing a model reply has no error variant: malformed replies degrade to
//! empty sections instead of failing.

use crate::exit_codes;
use crate::prompt::TemplateError;
use thiserror::Error;

/// Main error type for aladin operations.
#[derive(Error, Debug)]
pub enum AladinError {
    /// User provided invalid arguments or configuration, or a user path was unreadable.
    #[error("{0}")]
    UserError(String),

    /// The prompt skeleton could not be rendered. Raised before any inference call.
    #[error("Prompt template failed: {0}")]
    Template(#[from] TemplateError),

    /// The inference command produced no usable result.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The blog body missed the requested word count under `--strict`.
    #[error("Word count check failed: {0}")]
    WordCount(String),
}

impl AladinError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AladinError::UserError(_) => exit_codes::USER_ERROR,
            AladinError::Template(_) => exit_codes::TEMPLATE_FAILURE,
            AladinError::Inference(_) => exit_codes::INFERENCE_FAILURE,
            AladinError::WordCount(_) => exit_codes::WORD_COUNT_MISS,
        }
    }
}

/// Result type alias for aladin operations.
pub type Result<T> = std::result::Result<T, AladinError>;

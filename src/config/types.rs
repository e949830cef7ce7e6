//! Configuration types and defaults for aladin.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use crate::context::DEFAULT_STATE_DIR;
use crate::prompt::DEFAULT_PREAMBLE;
use crate::wordcount::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the rendered prompt reaches the inference command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptInput {
    /// Piped to the child's stdin (default).
    #[default]
    Stdin,
    /// Only written to `prompt.md`; the command reads `{prompt_file}` itself.
    File,
}

impl PromptInput {
    /// Parse a prompt input mode from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stdin" => Some(Self::Stdin),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// The external command that turns a prompt into a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceProfile {
    /// Command template. Supports `{model}`, `{temperature}`,
    /// `{max_output_tokens}`, `{prompt_file}` and `{run_dir}`.
    #[serde(default = "default_inference_command")]
    pub command: String,

    #[serde(default)]
    pub prompt_input: PromptInput,

    /// Seconds before the child is killed.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Extra environment variables for the child process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Default for InferenceProfile {
    fn default() -> Self {
        Self {
            command: default_inference_command(),
            prompt_input: PromptInput::default(),
            timeout_seconds: default_timeout_seconds(),
            environment: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

pub fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn default_temperature() -> f64 {
    0.9
}

pub fn default_max_output_tokens() -> u32 {
    8000
}

pub fn default_word_tolerance() -> u32 {
    DEFAULT_TOLERANCE
}

pub fn default_preamble() -> String {
    DEFAULT_PREAMBLE.to_string()
}

pub fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_inference_command() -> String {
    "llm -m {model} -o temperature {temperature} -o max_output_tokens {max_output_tokens}"
        .to_string()
}

pub fn default_timeout_seconds() -> u64 {
    600
}

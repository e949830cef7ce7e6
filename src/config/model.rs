//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for aladin.
///
/// This struct represents the contents of `aladin.yaml`.
/// Unknown fields are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Model settings
    // =========================================================================
    /// Model name passed to the inference command as `{model}`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, 0.0 to 2.0.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    // =========================================================================
    // Prompt settings
    // =========================================================================
    /// Words either side of the target, used for the prompt bounds and the
    /// word-count verdict.
    #[serde(default = "default_word_tolerance")]
    pub word_tolerance: u32,

    /// Acknowledgement the model is told to echo, stripped from replies.
    #[serde(default = "default_preamble")]
    pub preamble: String,

    /// Custom skeleton file, relative to the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    // =========================================================================
    // State settings
    // =========================================================================
    /// Directory for runs and events, relative to the workspace root.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Whether to append NDJSON events.
    #[serde(default = "default_true")]
    pub log_events: bool,

    // =========================================================================
    // Inference settings
    // =========================================================================
    #[serde(default)]
    pub inference: InferenceProfile,

    /// Fields this version does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            word_tolerance: default_word_tolerance(),
            preamble: default_preamble(),
            prompt_template: None,
            state_dir: default_state_dir(),
            log_events: default_true(),
            inference: InferenceProfile::default(),
            extra: BTreeMap::new(),
        }
    }
}

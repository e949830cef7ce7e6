//! Generation request and the word bounds derived from it.

use crate::error::{AladinError, Result};
use crate::wordcount::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the caller wants written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Article topic, e.g. "Cats".
    pub topic: String,
    /// Main SEO keyword.
    pub keyword: String,
    /// Optional background for the model. May be empty.
    #[serde(default)]
    pub context: String,
    /// Requested body length in words. Must be positive.
    pub target_word_count: u32,
}

/// Inclusive word range the prompt asks the model to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBounds {
    pub min: u32,
    pub max: u32,
}

impl WordBounds {
    /// Bounds of `target ± tolerance`. The lower bound saturates at zero.
    pub fn around(target: u32, tolerance: u32) -> Self {
        Self {
            min: target.saturating_sub(tolerance),
            max: target.saturating_add(tolerance),
        }
    }
}

impl GenerationRequest {
    /// Create a request with no extra context.
    pub fn new(topic: impl Into<String>, keyword: impl Into<String>, target_word_count: u32) -> Self {
        Self {
            topic: topic.into(),
            keyword: keyword.into(),
            context: String::new(),
            target_word_count,
        }
    }

    /// Attach background information for the model.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Check the request before rendering.
    ///
    /// The renderer substitutes whatever it is given, so this is where blank
    /// topics, blank keywords, and zero targets are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(AladinError::UserError(
                "topic must not be empty".to_string(),
            ));
        }
        if self.keyword.trim().is_empty() {
            return Err(AladinError::UserError(
                "keyword must not be empty".to_string(),
            ));
        }
        if self.target_word_count == 0 {
            return Err(AladinError::UserError(
                "target word count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Word bounds with the default tolerance of 50.
    pub fn bounds(&self) -> WordBounds {
        self.bounds_with(DEFAULT_TOLERANCE)
    }

    /// Word bounds with an explicit tolerance.
    pub fn bounds_with(&self, tolerance: u32) -> WordBounds {
        WordBounds::around(self.target_word_count, tolerance)
    }

    /// Template variables for the prompt skeleton.
    ///
    /// `prompt_preamble` is supplied by the renderer, not the request.
    pub fn to_template_vars(&self, tolerance: u32) -> HashMap<String, String> {
        let bounds = self.bounds_with(tolerance);
        let mut vars = HashMap::new();

        vars.insert("topic_name".to_string(), self.topic.clone());
        vars.insert("keyword".to_string(), self.keyword.clone());
        vars.insert("topic_details".to_string(), self.context.clone());
        vars.insert("min_word_count".to_string(), bounds.min.to_string());
        vars.insert("max_word_count".to_string(), bounds.max.to_string());

        vars
    }
}

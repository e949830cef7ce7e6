//! Prompt rendering from a skeleton and a generation request.

use super::request::GenerationRequest;
use super::template::{TemplateError, render_template};
use crate::wordcount::DEFAULT_TOLERANCE;
use std::collections::HashMap;
use std::fmt;

/// The built-in instruction skeleton.
pub const DEFAULT_SKELETON: &str = include_str!("skeleton.md");

/// Acknowledgement the skeleton tells the model to echo before its output.
pub const DEFAULT_PREAMBLE: &str = "Okay, I've read the prompt six times! I'm ready to write an awesome blog article as Aladin! I will remember the instructions until you tell me otherwise. Let's do this!";

/// Placeholder names a skeleton may reference.
pub const KNOWN_PLACEHOLDERS: &[&str] = &[
    "topic_name",
    "keyword",
    "topic_details",
    "min_word_count",
    "max_word_count",
    "prompt_preamble",
];

/// A fully substituted instruction, ready for the inference caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RenderedPrompt {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fills a skeleton with request fields.
///
/// Holds only immutable settings, so one renderer can serve any number of
/// requests from any number of threads.
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    skeleton: String,
    preamble: String,
    tolerance: u32,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SKELETON)
    }
}

impl PromptRenderer {
    /// Renderer over a custom skeleton, with the default preamble and tolerance.
    pub fn new(skeleton: impl Into<String>) -> Self {
        Self {
            skeleton: skeleton.into(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    /// Verify the skeleton parses and references only known placeholders.
    ///
    /// Catches a broken custom skeleton when it is loaded rather than on the
    /// first render.
    pub fn check(&self) -> Result<(), TemplateError> {
        let sample = self.vars_for(&GenerationRequest::new("", "", 0));
        render_template(&self.skeleton, &sample).map(|_| ())
    }

    /// Render the skeleton for `request`.
    pub fn render(&self, request: &GenerationRequest) -> Result<RenderedPrompt, TemplateError> {
        let vars = self.vars_for(request);
        render_template(&self.skeleton, &vars).map(RenderedPrompt)
    }

    fn vars_for(&self, request: &GenerationRequest) -> HashMap<String, String> {
        let mut vars = request.to_template_vars(self.tolerance);
        vars.insert("prompt_preamble".to_string(), self.preamble.clone());
        vars
    }
}

/// Render `request` with the built-in skeleton, preamble and tolerance.
pub fn render(request: &GenerationRequest) -> Result<RenderedPrompt, TemplateError> {
    PromptRenderer::default().render(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::SectionName;

    fn cats() -> GenerationRequest {
        GenerationRequest::new("Cats", "feline care", 1000)
    }

    #[test]
    fn test_render_substitutes_request_fields() {
        let prompt = render(&cats()).unwrap();
        let text = prompt.as_str();

        assert!(text.contains("Cats"));
        assert!(text.contains("feline care"));
        assert!(text.contains("950"));
        assert!(text.contains("1050"));
        assert!(!text.contains("{topic_name}"));
    }

    #[test]
    fn test_render_includes_preamble_instruction() {
        let prompt = render(&cats()).unwrap();
        assert!(prompt.as_str().contains(DEFAULT_PREAMBLE));
    }

    #[test]
    fn test_default_skeleton_names_every_marker_in_order() {
        let mut last = 0;
        for section in SectionName::ALL {
            let pos = DEFAULT_SKELETON
                .find(section.marker())
                .unwrap_or_else(|| panic!("skeleton is missing {}", section.marker()));
            assert!(pos >= last, "{} is out of order", section.marker());
            last = pos;
        }
    }

    #[test]
    fn test_default_skeleton_passes_check() {
        PromptRenderer::default().check().unwrap();
    }

    #[test]
    fn test_context_is_substituted_and_may_be_empty() {
        let with_context = render(&cats().with_context("Senior cats")).unwrap();
        assert!(with_context.as_str().contains("Senior cats"));

        assert!(render(&cats()).is_ok());
    }

    #[test]
    fn test_custom_tolerance_changes_bounds() {
        let renderer = PromptRenderer::new("{min_word_count}-{max_word_count}").with_tolerance(100);
        assert_eq!(renderer.render(&cats()).unwrap().as_str(), "900-1100");
    }

    #[test]
    fn test_small_target_never_renders_negative_bound() {
        let renderer = PromptRenderer::new("{min_word_count}-{max_word_count}");
        let request = GenerationRequest::new("Cats", "feline care", 20);
        assert_eq!(renderer.render(&request).unwrap().as_str(), "0-70");
    }

    #[test]
    fn test_custom_preamble() {
        let renderer = PromptRenderer::new("say: {prompt_preamble}").with_preamble("Ready!");
        assert_eq!(renderer.render(&cats()).unwrap().as_str(), "say: Ready!");
        assert_eq!(renderer.preamble(), "Ready!");
    }

    #[test]
    fn test_unknown_placeholder_is_template_error() {
        let renderer = PromptRenderer::new("Tone: {tone}");
        let err = renderer.render(&cats()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedPlaceholder {
                name: "tone".to_string(),
                position: 6,
            }
        );
        assert_eq!(renderer.check().unwrap_err(), err);
    }

    #[test]
    fn test_check_reports_syntax_errors() {
        let renderer = PromptRenderer::new("Topic: {topic_name");
        assert_eq!(
            renderer.check().unwrap_err(),
            TemplateError::UnmatchedBrace { position: 7 }
        );
    }

    #[test]
    fn test_known_placeholders_are_all_supplied() {
        let vars = PromptRenderer::default().vars_for(&cats());
        for name in KNOWN_PLACEHOLDERS {
            assert!(vars.contains_key(*name), "missing {}", name);
        }
        assert_eq!(vars.len(), KNOWN_PLACEHOLDERS.len());
    }

    #[test]
    fn test_rendered_prompt_display() {
        let prompt = PromptRenderer::new("Hi {keyword}").render(&cats()).unwrap();
        assert_eq!(prompt.to_string(), "Hi feline care");
        assert_eq!(prompt.into_string(), "Hi feline care");
    }
}

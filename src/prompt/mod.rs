//! Prompt generation for blog articles.
//!
//! This module provides:
//!
//! - **Template**: `{placeholder}` substitution with `{{`/`}}` escapes
//! - **Request**: the caller's topic, keyword, context and word target
//! - **Renderer**: fills the instruction skeleton from a request
//!
//! # Skeleton placeholders
//!
//! ```text
//! {topic_name}       article topic
//! {keyword}          main SEO keyword
//! {topic_details}    optional background, may be empty
//! {min_word_count}   target minus tolerance, never below zero
//! {max_word_count}   target plus tolerance
//! {prompt_preamble}  acknowledgement the model echoes first
//! ```

mod renderer;
mod request;
mod template;

pub use renderer::{
    DEFAULT_PREAMBLE, DEFAULT_SKELETON, KNOWN_PLACEHOLDERS, PromptRenderer, RenderedPrompt, render,
};
pub use request::{GenerationRequest, WordBounds};
pub use template::{TemplateError, placeholders, render_template, vars};

//! Aladin: SEO blog article generation through a large language model.
//!
//! The core is four pure pieces: a prompt renderer, a preamble stripper,
//! a marker-driven section parser and a word-count evaluator. Around them
//! sit the config file, an NDJSON event log, and an inference caller that
//! runs an external model command.
//!
//! ```
//! use aladin::pipeline::decompose;
//! use aladin::prompt::{GenerationRequest, render};
//! use aladin::reply::SectionName;
//!
//! let prompt = render(&GenerationRequest::new("Cats", "feline care", 1000))?;
//! assert!(prompt.as_str().contains("1050"));
//!
//! let reply = "###URL_SLUG###\nfeline-care\n###BLOG_CONTENT###\nCats are great.";
//! let result = decompose(reply, None, 3, 50);
//! assert_eq!(result.sections.get(SectionName::UrlSlug), "feline-care");
//! assert!(result.word_count.within_tolerance);
//! # Ok::<(), aladin::prompt::TemplateError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod inference;
pub mod pipeline;
pub mod prompt;
pub mod reply;
pub mod wordcount;

#[cfg(test)]
mod test_support;

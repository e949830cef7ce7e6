//! CLI argument parsing for aladin.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::prompt::GenerationRequest;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default requested body length, in words.
pub const DEFAULT_WORDS: u32 = 1000;

/// Aladin: blog article generation through a large language model.
///
/// Renders an SEO blog prompt from a topic and keyword, sends it to an
/// inference command, and splits the reply into titles, descriptions,
/// a URL slug and the article body.
#[derive(Parser, Debug)]
#[command(name = "aladin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for aladin.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default aladin.yaml in the current directory.
    Init(InitArgs),

    /// Render the blog prompt for a topic without calling a model.
    Prompt(PromptArgs),

    /// Split a saved model reply into sections and check its length.
    ///
    /// Reads from a file, or from stdin when FILE is `-` or omitted.
    Parse(ParseArgs),

    /// Render, call the inference command, and decompose the reply.
    ///
    /// Each run gets a directory under the state dir holding the prompt,
    /// the raw reply, stderr and the parsed sections.
    Generate(GenerateArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing aladin.yaml.
    #[arg(long)]
    pub force: bool,
}

/// What to write about. Shared by `prompt` and `generate`.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Article topic.
    #[arg(short, long)]
    pub topic: String,

    /// Main SEO keyword.
    #[arg(short, long)]
    pub keyword: String,

    /// Background information for the model.
    #[arg(short, long, default_value = "")]
    pub context: String,

    /// Target length of the article body, in words.
    #[arg(short, long, default_value_t = DEFAULT_WORDS, value_parser = clap::value_parser!(u32).range(1..))]
    pub words: u32,
}

impl RequestArgs {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.topic.clone(), self.keyword.clone(), self.words)
            .with_context(self.context.clone())
    }
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Write the prompt to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `parse` command.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Reply file to parse (`-` for stdin).
    #[arg(default_value = "-")]
    pub file: String,

    /// Target length the body is checked against.
    #[arg(short, long, default_value_t = DEFAULT_WORDS, value_parser = clap::value_parser!(u32).range(1..))]
    pub words: u32,

    /// Print sections and word count as JSON.
    #[arg(long)]
    pub json: bool,

    /// Fail when the body misses the word-count tolerance.
    #[arg(long)]
    pub strict: bool,

    /// Keep the acknowledgement preamble instead of stripping it.
    #[arg(long)]
    pub no_strip: bool,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Override the configured model.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print sections and word count as JSON.
    #[arg(long)]
    pub json: bool,

    /// Fail when the body misses the word-count tolerance.
    #[arg(long)]
    pub strict: bool,

    /// Show the command and prompt file without running the model.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

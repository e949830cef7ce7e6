//! Command implementations for aladin.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers they share: workspace loading and
//! best-effort event logging.

mod display;
mod generate;
mod init;
mod parse;
mod prompt;

use crate::cli::Command;
use crate::config::Config;
use crate::context::Workspace;
use crate::error::{AladinError, Result};
use crate::events::{Event, append_event};
use crate::prompt::{KNOWN_PLACEHOLDERS, PromptRenderer};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(args),
        Command::Prompt(args) => prompt::cmd_prompt(args),
        Command::Parse(args) => parse::cmd_parse(args),
        Command::Generate(args) => generate::cmd_generate(args),
    }
}

/// Resolve the workspace from the current directory and load its config.
fn load_workspace() -> Result<(Workspace, Config)> {
    let ws = Workspace::resolve()?;
    let config = Config::load_or_default(&ws)?;
    Ok((config.workspace(ws), config))
}

/// Build the configured renderer, pointing at the valid placeholders when
/// the skeleton is broken.
fn load_renderer(ws: &Workspace, config: &Config) -> Result<PromptRenderer> {
    config.renderer(ws).inspect_err(|e| {
        if let AladinError::Template(_) = e {
            eprintln!(
                "Hint: prompt templates may use {}. Write literal braces as {{{{ and }}}}.",
                KNOWN_PLACEHOLDERS
                    .iter()
                    .map(|name| format!("{{{}}}", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    })
}

/// Append an event unless logging is disabled. Failures only warn.
fn record_event(ws: &Workspace, config: &Config, event: Event) {
    if !config.log_events {
        return;
    }
    if let Err(e) = append_event(ws, &event) {
        eprintln!("Warning: failed to log {} event: {}", event.action, e);
    }
}

//! Implementation of the `aladin prompt` command.

use super::{load_renderer, load_workspace, record_event};
use crate::cli::PromptArgs;
use crate::config::Config;
use crate::context::Workspace;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::fs::atomic_write_file;
use crate::pipeline;
use crate::prompt::RenderedPrompt;
use serde_json::json;

/// Execute the `aladin prompt` command.
pub fn cmd_prompt(args: PromptArgs) -> Result<()> {
    let (ws, config) = load_workspace()?;
    let prompt = render_prompt(&ws, &config, &args)?;

    match &args.output {
        Some(path) => println!("Wrote prompt to {}", path.display()),
        None => {
            print!("{}", prompt);
            if !prompt.as_str().ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

/// Render the prompt, write it to `--output` if given, and log the render.
fn render_prompt(ws: &Workspace, config: &Config, args: &PromptArgs) -> Result<RenderedPrompt> {
    let renderer = load_renderer(ws, config)?;
    let request = args.request.to_request();
    let prompt = pipeline::prepare(&renderer, &request)?;

    if let Some(path) = &args.output {
        atomic_write_file(path, prompt.as_str())?;
    }

    let bounds = request.bounds_with(renderer.tolerance());
    record_event(
        ws,
        config,
        Event::new(EventAction::Render).with_details(json!({
            "topic": request.topic,
            "keyword": request.keyword,
            "target_word_count": request.target_word_count,
            "min_word_count": bounds.min,
            "max_word_count": bounds.max,
            "prompt_chars": prompt.as_str().chars().count(),
            "output": args.output.as_ref().map(|p| p.to_string_lossy().to_string()),
        })),
    );

    Ok(prompt)
}

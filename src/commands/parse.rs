//! Implementation of the `aladin parse` command.
//!
//! Decomposes a reply saved earlier (or piped in) without calling a model.

use super::display::{render_json, render_text};
use super::{load_workspace, record_event};
use crate::cli::ParseArgs;
use crate::config::Config;
use crate::context::Workspace;
use crate::error::{AladinError, Result};
use crate::events::{Event, EventAction};
use crate::pipeline::{Decomposition, decompose};
use serde_json::json;
use std::io::Read;

/// Execute the `aladin parse` command.
pub fn cmd_parse(args: ParseArgs) -> Result<()> {
    let (ws, config) = load_workspace()?;
    let raw = read_input(&args.file)?;

    let decomposition = parse_reply(&ws, &config, &args, &raw);

    if args.json {
        println!("{}", render_json(&decomposition)?);
    } else {
        print!("{}", render_text(&decomposition));
    }

    if args.strict {
        decomposition.ensure_within_tolerance()?;
    }

    Ok(())
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| AladinError::UserError(format!("failed to read reply from stdin: {}", e)))?;
        return Ok(raw);
    }

    std::fs::read_to_string(file)
        .map_err(|e| AladinError::UserError(format!("failed to read reply '{}': {}", file, e)))
}

/// Strip, parse and evaluate `raw` with the workspace settings, then log it.
fn parse_reply(ws: &Workspace, config: &Config, args: &ParseArgs, raw: &str) -> Decomposition {
    let preamble = (!args.no_strip).then_some(config.preamble.as_str());
    let decomposition = decompose(raw, preamble, args.words, config.word_tolerance);

    record_event(
        ws,
        config,
        Event::new(EventAction::Parse).with_details(json!({
            "source": args.file,
            "stripped": !args.no_strip,
            "missing": decomposition.sections.missing(),
            "word_count": decomposition.word_count,
        })),
    );

    decomposition
}

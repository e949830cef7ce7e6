//! Implementation of the `aladin generate` command.
//!
//! Full pipeline through the configured inference command:
//! 1. Loads config and builds the renderer (custom skeleton, tolerance, preamble)
//! 2. Renders the prompt for the request
//! 3. Runs the inference command in a fresh run directory, suffixed if taken
//! 4. Strips, parses and evaluates the reply
//! 5. Writes `sections.json` next to the prompt and reply

use super::display::{render_json, render_text};
use super::{load_renderer, load_workspace, record_event};
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::context::{Workspace, new_run_id};
use crate::error::{AladinError, Result};
use crate::events::{Event, EventAction};
use crate::fs::atomic_write_file;
use crate::inference::{CommandInference, InferenceCaller, ModelSettings};
use crate::pipeline::{self, Decomposition};
use crate::prompt::RenderedPrompt;
use crate::reply::RawReply;
use serde_json::json;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// What `--dry-run` would have executed.
#[derive(Debug)]
struct DryRunPlan {
    run_id: String,
    command: String,
    prompt_path: PathBuf,
    timeout_seconds: u64,
    environment: BTreeMap<String, String>,
}

/// A finished generation run.
#[derive(Debug)]
struct RunReport {
    run_id: String,
    run_dir: PathBuf,
    duration: Duration,
    decomposition: Decomposition,
}

#[derive(Debug)]
enum Outcome {
    DryRun(DryRunPlan),
    Completed(RunReport),
}

/// Execute the `aladin generate` command.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let (ws, config) = load_workspace()?;

    match run_generate(&ws, &config, &args)? {
        Outcome::DryRun(plan) => print_dry_run(&plan),
        Outcome::Completed(report) => {
            if args.json {
                println!("{}", render_json(&report.decomposition)?);
            } else {
                println!(
                    "Generated run {} in {:.2}s",
                    report.run_id,
                    report.duration.as_secs_f64()
                );
                println!("  Run dir:   {}", report.run_dir.display());
                println!();
                print!("{}", render_text(&report.decomposition));
            }

            if args.strict {
                report.decomposition.ensure_within_tolerance()?;
            }
        }
    }

    Ok(())
}

/// Inference caller that logs each attempt to the workspace event log.
struct RecordingCaller<'a> {
    inner: CommandInference,
    ws: &'a Workspace,
    config: &'a Config,
    run_id: &'a str,
    duration: Cell<Duration>,
}

impl InferenceCaller for RecordingCaller<'_> {
    fn complete(&self, prompt: &RenderedPrompt) -> Result<RawReply> {
        record_event(
            self.ws,
            self.config,
            Event::new(EventAction::Dispatch)
                .with_run(self.run_id)
                .with_details(json!({
                    "model": self.config.model,
                    "timeout_seconds": self.config.inference.timeout_seconds,
                    "prompt_file": self.inner.prompt_path().to_string_lossy(),
                })),
        );

        let run = self.inner.run(prompt)?;

        record_event(
            self.ws,
            self.config,
            Event::new(EventAction::Complete)
                .with_run(self.run_id)
                .with_details(json!({
                    "exit_code": run.exit_code,
                    "duration_ms": run.duration.as_millis() as u64,
                    "timed_out": run.timed_out,
                    "success": run.is_success(),
                    "reply_bytes": run.reply.len(),
                })),
        );

        self.duration.set(run.duration);
        run.into_reply()
    }
}

fn run_generate(ws: &Workspace, config: &Config, args: &GenerateArgs) -> Result<Outcome> {
    let mut config = config.clone();
    if let Some(model) = &args.model {
        if model.trim().is_empty() {
            return Err(AladinError::UserError(
                "--model must not be empty".to_string(),
            ));
        }
        config.model = model.clone();
    }

    let renderer = load_renderer(ws, &config)?;
    let request = args.request.to_request();
    let prompt = pipeline::prepare(&renderer, &request)?;

    let (run_id, run_dir) = ws.create_run_dir(&new_run_id(&request.topic))?;
    let inner = CommandInference::new(
        config.inference.clone(),
        ModelSettings::from_config(&config),
        &ws.root,
        &run_dir,
    );

    record_event(
        ws,
        &config,
        Event::new(EventAction::Render)
            .with_run(&run_id)
            .with_details(json!({
                "topic": request.topic,
                "keyword": request.keyword,
                "target_word_count": request.target_word_count,
                "prompt_chars": prompt.as_str().chars().count(),
                "dry_run": args.dry_run,
            })),
    );

    if args.dry_run {
        let command = inner.resolve_command()?;
        atomic_write_file(inner.prompt_path(), prompt.as_str())?;
        return Ok(Outcome::DryRun(DryRunPlan {
            run_id,
            command,
            prompt_path: inner.prompt_path(),
            timeout_seconds: config.inference.timeout_seconds,
            environment: config.inference.environment.clone(),
        }));
    }

    let caller = RecordingCaller {
        inner,
        ws,
        config: &config,
        run_id: &run_id,
        duration: Cell::new(Duration::ZERO),
    };
    let generation = pipeline::answer(&renderer, &request, prompt, &caller)?;
    let duration = caller.duration.get();
    let decomposition = generation.decomposition;

    let sections_path = run_dir.join("sections.json");
    atomic_write_file(&sections_path, &render_json(&decomposition)?)?;

    record_event(
        ws,
        &config,
        Event::new(EventAction::Parse)
            .with_run(&run_id)
            .with_details(json!({
                "source": "reply.txt",
                "missing": decomposition.sections.missing(),
                "word_count": decomposition.word_count,
            })),
    );

    Ok(Outcome::Completed(RunReport {
        run_id,
        run_dir,
        duration,
        decomposition,
    }))
}

fn print_dry_run(plan: &DryRunPlan) {
    println!("Dry run - would execute:");
    println!();
    println!("  Run:       {}", plan.run_id);
    println!("  Command:   {}", plan.command);
    println!("  Prompt:    {}", plan.prompt_path.display());
    println!("  Timeout:   {}s", plan.timeout_seconds);

    if !plan.environment.is_empty() {
        println!("  Environment:");
        for (key, value) in &plan.environment {
            println!("    {}={}", key, value);
        }
    }
}

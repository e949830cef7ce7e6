//! Event log for aladin.
//!
//! Every render, inference dispatch, completion and parse is appended to
//! `<state_dir>/events/events.ndjson` as one JSON object per line, so a
//! workspace keeps a history of what was asked and what came back.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `render`, `dispatch`, `complete` or `parse`
//! - `actor`: `USER@HOST`
//! - `run`: optional run id
//! - `details`: freeform object with action-specific details
//!
//! ```no_run
//! use aladin::context::Workspace;
//! use aladin::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ws = Workspace::resolve()?;
//! let event = Event::new(EventAction::Render)
//!     .with_details(json!({"topic": "Cats", "target_word_count": 1000}));
//! append_event(&ws, &event)?;
//! # Ok::<(), aladin::error::AladinError>(())
//! ```

use crate::context::Workspace;
use crate::error::{AladinError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Prompt rendered from a request
    Render,
    /// Inference command started
    Dispatch,
    /// Inference command finished (successfully or not)
    Complete,
    /// Reply decomposed into sections
    Parse,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Render => write!(f, "render"),
            EventAction::Dispatch => write!(f, "dispatch"),
            EventAction::Complete => write!(f, "complete"),
            EventAction::Parse => write!(f, "parse"),
        }
    }
}

/// An event record for the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// Who ran the command (`USER@HOST`).
    pub actor: String,

    /// Run id for events tied to a generation run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            run: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run = Some(run_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            AladinError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Get the path to the events file.
pub fn events_file_path(ws: &Workspace) -> PathBuf {
    ws.events_dir().join("events.ndjson")
}

/// Append an event to the events log.
///
/// The file and its directory are created on first use. Each append writes
/// one line and syncs the file.
pub fn append_event(ws: &Workspace, event: &Event) -> Result<()> {
    let events_file = events_file_path(ws);
    let json_line = event.to_ndjson_line()?;

    let events_dir = ws.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            AladinError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            AladinError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        AladinError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        AladinError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read every event in the log, oldest first. A missing log is empty.
pub fn read_events(ws: &Workspace) -> Result<Vec<Event>> {
    let events_file = events_file_path(ws);
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&events_file).map_err(|e| {
        AladinError::UserError(format!(
            "failed to read events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                AladinError::UserError(format!(
                    "malformed event on line {} of '{}': {}",
                    i + 1,
                    events_file.display(),
                    e
                ))
            })
        })
        .collect()
}

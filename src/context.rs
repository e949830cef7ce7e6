//! Workspace resolution for aladin.
//!
//! A workspace is the directory holding `aladin.yaml`. Commands find it by
//! walking up from the current directory, so they behave the same from any
//! subdirectory. Without a config file the starting directory is used and
//! every setting takes its default.
//!
//! Layout under the workspace root:
//!
//! ```text
//! aladin.yaml
//! .aladin/
//!   events/events.ndjson
//!   runs/<run_id>/prompt.md
//!   runs/<run_id>/reply.txt
//!   runs/<run_id>/stderr.log
//!   runs/<run_id>/sections.json
//! ```

use crate::error::{AladinError, Result};
use chrono::Utc;
use regex::Regex;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Config file name looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "aladin.yaml";

/// Default state directory relative to the workspace root.
pub const DEFAULT_STATE_DIR: &str = ".aladin";

/// Maximum length of the topic slug in a run id.
const RUN_SLUG_MAX_LEN: usize = 40;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

/// Resolved paths for one workspace. All paths are absolute.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory holding (or that would hold) `aladin.yaml`.
    pub root: PathBuf,

    /// Directory for runs and events (default: `{root}/.aladin/`).
    pub state_dir: PathBuf,
}

impl Workspace {
    /// Resolve the workspace from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            AladinError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the workspace from a specific directory.
    ///
    /// Walks up to the nearest ancestor containing `aladin.yaml`; falls back
    /// to `dir` itself.
    pub fn resolve_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let start = dir.canonicalize().map_err(|e| {
            AladinError::UserError(format!(
                "failed to resolve directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let root = start
            .ancestors()
            .find(|candidate| candidate.join(CONFIG_FILE_NAME).is_file())
            .map(Path::to_path_buf)
            .unwrap_or(start);

        Ok(Self::at(root))
    }

    /// Workspace rooted exactly at `root`, with the default state directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state_dir = root.join(DEFAULT_STATE_DIR);
        Self { root, state_dir }
    }

    /// Relocate the state directory. Relative paths are taken from the root.
    pub fn with_state_dir(mut self, state_dir: &str) -> Self {
        self.state_dir = self.root.join(state_dir);
        self
    }

    /// Path to `aladin.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn has_config(&self) -> bool {
        self.config_path().is_file()
    }

    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join("events")
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.state_dir.join("runs")
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.runs_dir().join(run_id)
    }

    /// Create a fresh run directory for `base_id`.
    ///
    /// If `base_id` is taken, `-2`, `-3`, ... are appended until an unused
    /// name is created. Returns the id actually used and its directory.
    pub fn create_run_dir(&self, base_id: &str) -> Result<(String, PathBuf)> {
        let runs_dir = self.runs_dir();
        fs::create_dir_all(&runs_dir).map_err(|e| {
            AladinError::UserError(format!(
                "failed to create runs directory '{}': {}",
                runs_dir.display(),
                e
            ))
        })?;

        let mut attempt = 1u32;
        loop {
            let run_id = if attempt == 1 {
                base_id.to_string()
            } else {
                format!("{}-{}", base_id, attempt)
            };
            let dir = runs_dir.join(&run_id);
            match fs::create_dir(&dir) {
                Ok(()) => return Ok((run_id, dir)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(AladinError::UserError(format!(
                        "failed to create run directory '{}': {}",
                        dir.display(),
                        e
                    )));
                }
            }
        }
    }

    /// Resolve a user-supplied path against the workspace root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// New run id of the form `YYYYMMDD-HHMMSS-<topic-slug>`.
pub fn new_run_id(topic: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let slug = slugify(topic);
    if slug.is_empty() {
        stamp.to_string()
    } else {
        format!("{}-{}", stamp, slug)
    }
}

/// Lowercase ASCII slug: runs of other characters become one `-`.
fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    let mut cut = slug.len().min(RUN_SLUG_MAX_LEN);
    while !slug.is_char_boundary(cut) {
        cut -= 1;
    }
    slug[..cut].trim_end_matches('-').to_string()
}

//! Inference subprocess executor.
//!
//! Runs the configured command with timeout, output capture, and error
//! handling. Each call owns one run directory:
//!
//! ```text
//! <run_dir>/prompt.md    rendered prompt
//! <run_dir>/reply.txt    child stdout
//! <run_dir>/stderr.log   child stderr
//! ```

use super::InferenceCaller;
use crate::config::{Config, InferenceProfile, PromptInput};
use crate::error::{AladinError, Result};
use crate::fs::atomic_write_file;
use crate::prompt::{RenderedPrompt, TemplateError, render_template};
use crate::reply::RawReply;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Variables available to the inference command template.
pub const COMMAND_VARIABLES: &[&str] = &[
    "model",
    "temperature",
    "max_output_tokens",
    "prompt_file",
    "run_dir",
];

/// Lines of stderr quoted in inference errors.
const STDERR_EXCERPT_LINES: usize = 20;

/// Model parameters forwarded to the command.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl ModelSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Result of executing the inference command.
#[derive(Debug, Clone)]
pub struct InferenceRun {
    /// Everything the command wrote to stdout.
    pub reply: String,
    /// Exit code of the process (None if killed or didn't exit normally).
    pub exit_code: Option<i32>,
    pub duration: Duration,
    /// Whether the process was killed due to timeout.
    pub timed_out: bool,
    /// The command line that was executed.
    pub command: String,
    pub reply_path: PathBuf,
    pub stderr_path: PathBuf,
}

impl InferenceRun {
    /// Check if the process exited cleanly within the timeout.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// The reply, or an inference error when the run produced none.
    pub fn into_reply(self) -> Result<RawReply> {
        let failure = if self.timed_out {
            Some(format!(
                "command timed out after {:.1}s",
                self.duration.as_secs_f64()
            ))
        } else if self.exit_code != Some(0) {
            Some(match self.exit_code {
                Some(code) => format!("command exited with code {}", code),
                None => "command was terminated by a signal".to_string(),
            })
        } else if self.reply.trim().is_empty() {
            Some("command produced an empty reply".to_string())
        } else {
            None
        };

        match failure {
            None => Ok(RawReply::new(self.reply)),
            Some(reason) => {
                let mut message = format!("{}\nCommand: {}", reason, self.command);
                let excerpt = stderr_excerpt(&self.stderr_path);
                if !excerpt.is_empty() {
                    message.push_str(&format!("\nStderr:\n{}", excerpt));
                }
                message.push_str(&format!("\nLogs: {}", self.stderr_path.display()));
                Err(AladinError::Inference(message))
            }
        }
    }
}

/// Inference caller that shells out to a configured command.
#[derive(Debug, Clone)]
pub struct CommandInference {
    profile: InferenceProfile,
    settings: ModelSettings,
    working_dir: PathBuf,
    run_dir: PathBuf,
}

impl CommandInference {
    /// # Arguments
    ///
    /// * `profile` - Command template, prompt delivery, timeout and environment
    /// * `settings` - Model parameters substituted into the command
    /// * `working_dir` - Directory the command runs in (the workspace root)
    /// * `run_dir` - Directory receiving the prompt, reply and stderr files
    pub fn new(
        profile: InferenceProfile,
        settings: ModelSettings,
        working_dir: impl Into<PathBuf>,
        run_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            profile,
            settings,
            working_dir: working_dir.into(),
            run_dir: run_dir.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn prompt_path(&self) -> PathBuf {
        self.run_dir.join("prompt.md")
    }

    pub fn reply_path(&self) -> PathBuf {
        self.run_dir.join("reply.txt")
    }

    pub fn stderr_path(&self) -> PathBuf {
        self.run_dir.join("stderr.log")
    }

    /// Values for every name in [`COMMAND_VARIABLES`].
    pub fn variables(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("model".to_string(), self.settings.model.clone());
        vars.insert(
            "temperature".to_string(),
            self.settings.temperature.to_string(),
        );
        vars.insert(
            "max_output_tokens".to_string(),
            self.settings.max_output_tokens.to_string(),
        );
        vars.insert(
            "prompt_file".to_string(),
            self.prompt_path().to_string_lossy().to_string(),
        );
        vars.insert(
            "run_dir".to_string(),
            self.run_dir.to_string_lossy().to_string(),
        );
        vars
    }

    /// Split the command template into arguments, then fill each one.
    ///
    /// Substituting after the split keeps a value with spaces (a workspace
    /// under `My Blog/`, a model name) inside a single argument.
    pub fn resolve_args(&self) -> Result<Vec<String>> {
        let template = &self.profile.command;
        let parts = shell_words::split(template).map_err(|e| {
            AladinError::UserError(format!(
                "failed to parse inference command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                template, e
            ))
        })?;

        if parts.is_empty() {
            return Err(AladinError::UserError(format!(
                "inference command is empty after parsing: '{}'",
                template
            )));
        }

        let variables = self.variables();
        parts
            .iter()
            .map(|part| {
                render_template(part, &variables).map_err(|e| self.template_error(e, &variables))
            })
            .collect()
    }

    /// The resolved command as one shell-quoted line, for display and logs.
    pub fn resolve_command(&self) -> Result<String> {
        Ok(shell_words::join(self.resolve_args()?))
    }

    fn template_error(&self, e: TemplateError, variables: &HashMap<String, String>) -> AladinError {
        match e {
            TemplateError::UndefinedPlaceholder { name, .. } => {
                AladinError::UserError(format!(
                    "inference command references undefined variable '{}'\n\
                     Command: {}\n\
                     Available variables: {}",
                    name,
                    self.profile.command,
                    format_vars(variables)
                ))
            }
            TemplateError::UnmatchedBrace { .. } => AladinError::UserError(format!(
                "inference command has an unmatched brace: '{}'",
                self.profile.command
            )),
            TemplateError::EmptyPlaceholder { .. } => AladinError::UserError(format!(
                "inference command has an empty variable name: '{}'",
                self.profile.command
            )),
        }
    }

    /// Execute the command for one prompt.
    ///
    /// Fails only when the command cannot be built or started; a timeout or
    /// non-zero exit is reported in the returned [`InferenceRun`].
    pub fn run(&self, prompt: &RenderedPrompt) -> Result<InferenceRun> {
        let args = self.resolve_args()?;
        let command_str = shell_words::join(&args);

        atomic_write_file(self.prompt_path(), prompt.as_str())?;

        let reply_path = self.reply_path();
        let stderr_path = self.stderr_path();
        let stdout_file = create_log(&reply_path)?;
        let stderr_file = create_log(&stderr_path)?;

        let program = &args[0];
        let mut command = Command::new(program);
        command
            .args(&args[1..])
            .current_dir(&self.working_dir)
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file));

        command.stdin(match self.profile.prompt_input {
            PromptInput::Stdin => Stdio::piped(),
            PromptInput::File => Stdio::null(),
        });

        for (key, value) in &self.profile.environment {
            command.env(key, value);
        }

        let start_time = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            AladinError::Inference(format!(
                "failed to execute inference command '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                program, e
            ))
        })?;

        // Fed from a thread so a child that stops reading cannot block the timeout.
        let feeder = child.stdin.take().map(|mut stdin| {
            let text = prompt.as_str().to_owned();
            thread::spawn(move || {
                let _ = stdin.write_all(text.as_bytes());
            })
        });

        let timeout = Duration::from_secs(self.profile.timeout_seconds);
        let waited = wait_with_timeout(&mut child, timeout);
        let duration = start_time.elapsed();

        if let Some(feeder) = feeder {
            let _ = feeder.join();
        }
        let (exit_code, timed_out) = waited?;

        let reply = std::fs::read(&reply_path).map_err(|e| {
            AladinError::UserError(format!(
                "failed to read reply '{}': {}",
                reply_path.display(),
                e
            ))
        })?;

        Ok(InferenceRun {
            reply: String::from_utf8_lossy(&reply).into_owned(),
            exit_code,
            duration,
            timed_out,
            command: command_str,
            reply_path,
            stderr_path,
        })
    }
}

impl InferenceCaller for CommandInference {
    fn complete(&self, prompt: &RenderedPrompt) -> Result<RawReply> {
        self.run(prompt)?.into_reply()
    }
}

fn create_log(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AladinError::UserError(format!(
                "failed to create run directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    std::fs::File::create(path).map_err(|e| {
        AladinError::UserError(format!(
            "failed to create log '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok((None, true));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => return Err(abandon(child, e)),
        }
    }
}

/// Kill a child whose status can no longer be read, and describe why.
fn abandon(child: &mut Child, e: std::io::Error) -> AladinError {
    kill_process(child);
    AladinError::Inference(format!("failed to check process status: {}", e))
}

fn kill_process(child: &mut Child) {
    // SIGKILL on Unix, TerminateProcess on Windows.
    let _ = child.kill();
    let _ = child.wait();
}

fn format_vars(vars: &HashMap<String, String>) -> String {
    let mut keys: Vec<_> = vars.keys().map(String::as_str).collect();
    keys.sort();
    keys.join(", ")
}

/// Last lines of the stderr log, or nothing if it is empty or unreadable.
fn stderr_excerpt(path: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(path) else {
        return String::new();
    };

    let lines: Vec<&str> = content.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_EXCERPT_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn settings() -> ModelSettings {
        ModelSettings {
            model: "test-model".to_string(),
            temperature: 0.9,
            max_output_tokens: 8000,
        }
    }

    fn make_caller(temp_dir: &TempDir, command: &str) -> CommandInference {
        let profile = InferenceProfile {
            command: command.to_string(),
            timeout_seconds: 10,
            ..Default::default()
        };
        CommandInference::new(
            profile,
            settings(),
            temp_dir.path(),
            temp_dir.path().join("runs").join("r1"),
        )
    }

    fn prompt(text: &str) -> RenderedPrompt {
        RenderedPrompt::from(text.to_string())
    }

    #[test]
    fn test_variables_cover_command_variables() {
        let temp_dir = TempDir::new().unwrap();
        let caller = make_caller(&temp_dir, "llm");
        let vars = caller.variables();

        for name in COMMAND_VARIABLES {
            assert!(vars.contains_key(*name), "missing {}", name);
        }
        assert_eq!(vars["model"], "test-model");
        assert_eq!(vars["temperature"], "0.9");
        assert_eq!(vars["max_output_tokens"], "8000");
        assert!(vars["prompt_file"].ends_with("prompt.md"));
    }

    #[test]
    fn test_resolve_command() {
        let temp_dir = TempDir::new().unwrap();
        let caller = make_caller(
            &temp_dir,
            "llm -m {model} -o temperature {temperature} -o max_output_tokens {max_output_tokens}",
        );

        assert_eq!(
            caller.resolve_command().unwrap(),
            "llm -m test-model -o temperature 0.9 -o max_output_tokens 8000"
        );
    }

    #[test]
    fn test_resolve_command_undefined_variable_error() {
        let temp_dir = TempDir::new().unwrap();
        let caller = make_caller(&temp_dir, "llm --api-key {api_key}");

        let err = caller.resolve_command().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, AladinError::UserError(_)));
        assert!(msg.contains("api_key"));
        assert!(msg.contains("Available variables"));
        assert!(msg.contains("prompt_file"));
    }

    #[test]
    fn test_values_with_spaces_stay_single_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let mut caller = make_caller(&temp_dir, "llm -m {model} --out {run_dir}/reply.txt");
        caller.settings.model = "local model".to_string();
        caller.run_dir = PathBuf::from("/tmp/my blog/runs/r1");

        let args = caller.resolve_args().unwrap();
        assert_eq!(
            args,
            vec!["llm", "-m", "local model", "--out", "/tmp/my blog/runs/r1/reply.txt"]
        );
        assert_eq!(
            caller.resolve_command().unwrap(),
            "llm -m 'local model' --out '/tmp/my blog/runs/r1/reply.txt'"
        );
    }

    #[test]
    fn test_invalid_command_error() {
        let temp_dir = TempDir::new().unwrap();
        let caller = make_caller(&temp_dir, "echo 'unclosed");

        let err = caller.run(&prompt("hi")).unwrap_err();
        assert!(err.to_string().contains("failed to parse inference command"));
    }

    #[test]
    fn test_nonexistent_command_error() {
        let temp_dir = TempDir::new().unwrap();
        let caller = make_caller(&temp_dir, "nonexistent_command_12345");

        let err = caller.run(&prompt("hi")).unwrap_err();
        assert!(matches!(err, AladinError::Inference(_)));
        assert!(err.to_string().contains("failed to execute inference command"));
    }

    #[test]
    fn test_into_reply_success() {
        let run = InferenceRun {
            reply: "###BLOG_CONTENT###\nBody".to_string(),
            exit_code: Some(0),
            duration: Duration::from_millis(5),
            timed_out: false,
            command: "llm".to_string(),
            reply_path: PathBuf::from("reply.txt"),
            stderr_path: PathBuf::from("missing-stderr.log"),
        };
        assert!(run.is_success());
        assert_eq!(run.into_reply().unwrap().as_str(), "###BLOG_CONTENT###\nBody");
    }

    #[test]
    fn test_into_reply_failures() {
        let base = InferenceRun {
            reply: String::new(),
            exit_code: Some(0),
            duration: Duration::from_secs(1),
            timed_out: false,
            command: "llm".to_string(),
            reply_path: PathBuf::from("reply.txt"),
            stderr_path: PathBuf::from("missing-stderr.log"),
        };

        let err = base.clone().into_reply().unwrap_err();
        assert!(matches!(err, AladinError::Inference(_)));
        assert!(err.to_string().contains("empty reply"));

        let nonzero = InferenceRun {
            exit_code: Some(2),
            reply: "partial".to_string(),
            ..base.clone()
        };
        assert!(!nonzero.is_success());
        assert!(nonzero.into_reply().unwrap_err().to_string().contains("code 2"));

        let timed_out = InferenceRun {
            exit_code: None,
            timed_out: true,
            ..base
        };
        assert!(timed_out.into_reply().unwrap_err().to_string().contains("timed out"));
    }

    #[test]
    fn test_stderr_excerpt_keeps_tail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stderr.log");
        let lines: Vec<String> = (1..=30).map(|i| format!("line {}", i)).collect();
        std::fs::write(&path, lines.join("\n")).unwrap();

        let excerpt = stderr_excerpt(&path);
        assert!(excerpt.starts_with("line 11"));
        assert!(excerpt.ends_with("line 30"));
        assert_eq!(stderr_excerpt(&temp_dir.path().join("none.log")), "");
    }

    #[cfg(not(windows))]
    mod unix {
        use super::*;

        #[test]
        fn test_prompt_piped_on_stdin() {
            let temp_dir = TempDir::new().unwrap();
            let caller = make_caller(&temp_dir, "cat");

            let run = caller.run(&prompt("Write about cats.")).unwrap();

            assert!(run.is_success());
            assert_eq!(run.reply, "Write about cats.");
            assert!(run.reply_path.exists());
            assert!(run.stderr_path.exists());
            assert_eq!(
                std::fs::read_to_string(caller.prompt_path()).unwrap(),
                "Write about cats."
            );
        }

        #[test]
        fn test_prompt_passed_as_file() {
            let temp_dir = TempDir::new().unwrap();
            let profile = InferenceProfile {
                command: "cat {prompt_file}".to_string(),
                prompt_input: PromptInput::File,
                timeout_seconds: 10,
                ..Default::default()
            };
            let caller = CommandInference::new(
                profile,
                settings(),
                temp_dir.path(),
                temp_dir.path().join("run"),
            );

            let reply = caller.complete(&prompt("from file")).unwrap();
            assert_eq!(reply.as_str(), "from file");
        }

        #[test]
        fn test_model_variable_substituted() {
            let temp_dir = TempDir::new().unwrap();
            let caller = make_caller(&temp_dir, "echo {model}");

            let reply = caller.complete(&prompt("ignored")).unwrap();
            assert_eq!(reply.as_str().trim(), "test-model");
        }

        #[test]
        fn test_nonzero_exit_is_inference_error() {
            let temp_dir = TempDir::new().unwrap();
            let caller = make_caller(&temp_dir, "sh -c 'echo quota exceeded >&2; exit 1'");

            let run = caller.run(&prompt("hi")).unwrap();
            assert_eq!(run.exit_code, Some(1));
            assert!(!run.is_success());

            let err = run.into_reply().unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("code 1"));
            assert!(msg.contains("quota exceeded"));
        }

        #[test]
        fn test_empty_reply_is_inference_error() {
            let temp_dir = TempDir::new().unwrap();
            let caller = make_caller(&temp_dir, "true");

            let err = caller.complete(&prompt("hi")).unwrap_err();
            assert!(matches!(err, AladinError::Inference(_)));
        }

        #[test]
        fn test_timeout_kills_process() {
            let temp_dir = TempDir::new().unwrap();
            let profile = InferenceProfile {
                command: "sleep 60".to_string(),
                timeout_seconds: 1,
                ..Default::default()
            };
            let caller = CommandInference::new(
                profile,
                settings(),
                temp_dir.path(),
                temp_dir.path().join("run"),
            );

            let start = Instant::now();
            let run = caller.run(&prompt("hi")).unwrap();

            assert!(run.timed_out);
            assert_eq!(run.exit_code, None);
            assert!(start.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn test_environment_passed_to_child() {
            let temp_dir = TempDir::new().unwrap();
            let mut environment = BTreeMap::new();
            environment.insert("ALADIN_TEST_VAR".to_string(), "hello_env".to_string());
            let profile = InferenceProfile {
                command: "sh -c 'echo $ALADIN_TEST_VAR'".to_string(),
                timeout_seconds: 10,
                environment,
                ..Default::default()
            };
            let caller = CommandInference::new(
                profile,
                settings(),
                temp_dir.path(),
                temp_dir.path().join("run"),
            );

            let reply = caller.complete(&prompt("hi")).unwrap();
            assert_eq!(reply.as_str().trim(), "hello_env");
        }

        #[test]
        fn test_prompt_file_under_path_with_spaces() {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path().join("my blog");
            let profile = InferenceProfile {
                command: "cat {prompt_file}".to_string(),
                prompt_input: PromptInput::File,
                timeout_seconds: 10,
                ..Default::default()
            };
            let caller =
                CommandInference::new(profile, settings(), &root, root.join(".aladin/runs/r1"));
            std::fs::create_dir_all(&root).unwrap();

            let reply = caller.complete(&prompt("spaced out")).unwrap();
            assert_eq!(reply.as_str(), "spaced out");
        }

        #[test]
        fn test_abandon_kills_and_reaps_child() {
            let mut child = Command::new("sleep").arg("60").spawn().unwrap();

            let err = abandon(&mut child, std::io::Error::other("status unavailable"));

            assert!(matches!(err, AladinError::Inference(_)));
            assert!(err.to_string().contains("status unavailable"));
            assert!(child.try_wait().unwrap().is_some());
        }

        #[test]
        fn test_runs_in_working_dir() {
            let temp_dir = TempDir::new().unwrap();
            std::fs::write(temp_dir.path().join("marker.txt"), "here").unwrap();
            let caller = make_caller(&temp_dir, "cat marker.txt");

            let reply = caller.complete(&prompt("hi")).unwrap();
            assert_eq!(reply.as_str(), "here");
        }
    }
}

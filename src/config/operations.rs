//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::PromptInput;
use crate::context::Workspace;
use crate::error::{AladinError, Result};
use crate::inference::COMMAND_VARIABLES;
use crate::prompt::{PromptRenderer, placeholders};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are kept in `extra`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the aladin.yaml file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(AladinError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            AladinError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the workspace config, or the defaults when there is no config file.
    pub fn load_or_default(ws: &Workspace) -> Result<Self> {
        if ws.has_config() {
            Self::load(ws.config_path())
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| AladinError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            AladinError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `temperature` must be between 0.0 and 2.0
    /// - `max_output_tokens` and `inference.timeout_seconds` must be positive
    /// - `preamble`, `state_dir` and `inference.command` must be non-empty
    /// - `inference.command` may only use known variables, and must use
    ///   `{prompt_file}` when `prompt_input` is `file`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(format!(
                "temperature must be between 0.0 and 2.0 (found {})",
                self.temperature
            )));
        }

        if self.max_output_tokens == 0 {
            return Err(invalid("max_output_tokens must be greater than 0"));
        }

        if self.preamble.trim().is_empty() {
            return Err(invalid("preamble must be non-empty"));
        }

        if self.state_dir.trim().is_empty() {
            return Err(invalid("state_dir must be non-empty"));
        }

        if self.inference.timeout_seconds == 0 {
            return Err(invalid("inference.timeout_seconds must be greater than 0"));
        }

        self.validate_command()
    }

    fn validate_command(&self) -> Result<()> {
        let command = &self.inference.command;
        if command.trim().is_empty() {
            return Err(invalid("inference.command must be non-empty"));
        }

        let used = placeholders(command)
            .map_err(|e| invalid(format!("inference.command is malformed: {}", e)))?;

        if let Some(unknown) = used
            .iter()
            .find(|name| !COMMAND_VARIABLES.contains(&name.as_str()))
        {
            return Err(invalid(format!(
                "inference.command uses unknown variable '{{{}}}' (available: {})",
                unknown,
                COMMAND_VARIABLES.join(", ")
            )));
        }

        if self.inference.prompt_input == PromptInput::File
            && !used.iter().any(|name| name == "prompt_file")
        {
            return Err(invalid(
                "inference.prompt_input is 'file' but inference.command does not reference {prompt_file}",
            ));
        }

        Ok(())
    }

    /// Apply `state_dir` to a resolved workspace.
    pub fn workspace(&self, ws: Workspace) -> Workspace {
        ws.with_state_dir(&self.state_dir)
    }

    /// Build a prompt renderer from the built-in or custom skeleton.
    ///
    /// The skeleton is checked here, so a broken custom template fails before
    /// any request is rendered.
    pub fn renderer(&self, ws: &Workspace) -> Result<PromptRenderer> {
        let renderer = match &self.prompt_template {
            Some(path) => {
                let path = ws.resolve_path(path);
                let skeleton = std::fs::read_to_string(&path).map_err(|e| {
                    AladinError::UserError(format!(
                        "failed to read prompt template '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                PromptRenderer::new(skeleton)
            }
            None => PromptRenderer::default(),
        };

        let renderer = renderer
            .with_preamble(self.preamble.clone())
            .with_tolerance(self.word_tolerance);
        renderer.check()?;
        Ok(renderer)
    }
}

fn invalid(message: impl AsRef<str>) -> AladinError {
    AladinError::UserError(format!("config validation failed: {}", message.as_ref()))
}

//! Implementation of the `aladin init` command.
//!
//! Writes `aladin.yaml` with every setting at its default, so the file
//! doubles as documentation of what can be configured.

use crate::cli::InitArgs;
use crate::config::Config;
use crate::context::CONFIG_FILE_NAME;
use crate::error::{AladinError, Result};
use crate::fs::atomic_write_file;
use std::path::{Path, PathBuf};

const CONFIG_HEADER: &str = "\
# aladin configuration.
#
# inference.command variables: {model} {temperature} {max_output_tokens}
# {prompt_file} {run_dir}. With prompt_input: stdin the prompt is piped
# to the command; with prompt_input: file the command must read {prompt_file}.
";

/// Execute the `aladin init` command.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        AladinError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    let path = init_config(&cwd, args.force)?;

    println!("Wrote {}", path.display());
    println!();
    println!("Next steps:");
    println!("  Set inference.command to your model CLI.");
    println!("  Preview a prompt with `aladin prompt --topic <T> --keyword <K>`.");

    Ok(())
}

/// Write a default config into `dir`. Refuses to overwrite unless `force`.
fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);

    if path.exists() && !force {
        return Err(AladinError::UserError(format!(
            "'{}' already exists.\n\
             Fix: edit it directly, or run `aladin init --force` to reset it to defaults.",
            path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&path, &format!("{}\n{}", CONFIG_HEADER, yaml))?;

    Ok(path)
}

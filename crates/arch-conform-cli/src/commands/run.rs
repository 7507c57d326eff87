//! Run command: evaluate every configured rule, gate CI on the verdict.

use anyhow::{bail, Context, Result};
use std::path::Path;

use arch_conform::{run_with_config, CancelToken, EvalOptions, ProjectConfig};

use super::{error_code, output, EXIT_OK, EXIT_VIOLATIONS};
use crate::config_resolver;
use crate::OutputFormat;

/// Runs the run command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    warn_empty: bool,
    explicit_config: Option<&Path>,
) -> Result<i32> {
    let source = config_resolver::resolve(path, explicit_config);
    let Some(config_path) = source.path() else {
        bail!("No arch-conform.toml found. Run `arch-conform init` to create one.");
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", config_path.display());
    }

    let config = ProjectConfig::from_file(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let root = if config.root.is_absolute() {
        config.root.clone()
    } else {
        path.join(&config.root)
    };

    let options = EvalOptions {
        flag_empty_selection: warn_empty,
    };
    match run_with_config(&root, &config, &CancelToken::new(), options) {
        Ok(report) => {
            output::print_report(&report, format)?;
            Ok(if report.success() {
                EXIT_OK
            } else {
                EXIT_VIOLATIONS
            })
        }
        Err(error) => Ok(error_code(&error)),
    }
}

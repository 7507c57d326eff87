//! Single-rule check commands.

use anyhow::Result;
use std::path::Path;

use arch_conform::{
    check_isolation, check_layer_dependency, check_naming, PipelineError, RuleResult, SymbolKind,
};

use super::{error_code, output, EXIT_OK, EXIT_VIOLATIONS};
use crate::OutputFormat;

/// Runs the check-layer command.
pub fn layer(path: &Path, layer: &str, forbidden: &str, format: OutputFormat) -> Result<i32> {
    finish(check_layer_dependency(path, layer, forbidden), format)
}

/// Runs the check-isolation command.
pub fn isolation(path: &Path, source: &str, target: &str, format: OutputFormat) -> Result<i32> {
    finish(check_isolation(path, source, target), format)
}

/// Runs the check-naming command.
pub fn naming(
    path: &Path,
    namespace: &str,
    suffix: &str,
    kind: SymbolKind,
    format: OutputFormat,
) -> Result<i32> {
    finish(check_naming(path, namespace, suffix, kind), format)
}

fn finish(outcome: Result<RuleResult, PipelineError>, format: OutputFormat) -> Result<i32> {
    match outcome {
        Ok(result) => {
            output::print_rule_result(&result, format)?;
            Ok(if result.success() {
                EXIT_OK
            } else {
                EXIT_VIOLATIONS
            })
        }
        Err(error) => Ok(error_code(&error)),
    }
}

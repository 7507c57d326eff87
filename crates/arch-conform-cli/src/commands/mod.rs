//! CLI subcommand implementations.

pub mod check;
pub mod export;
pub mod init;
pub mod output;
pub mod run;

/// Completed pass.
pub const EXIT_OK: i32 = 0;
/// At least one rule violation.
pub const EXIT_VIOLATIONS: i32 = 1;
/// Fatal setup fault (unreadable root, malformed pattern or config).
pub const EXIT_SETUP: i32 = 2;
/// The run was cancelled; neither pass nor fail.
pub const EXIT_CANCELLED: i32 = 3;

use arch_conform::PipelineError;

/// Prints a pipeline error and maps it to an exit code.
pub fn error_code(error: &PipelineError) -> i32 {
    eprintln!("error: {error}");
    match error {
        PipelineError::Setup(_) => EXIT_SETUP,
        PipelineError::Cancelled => EXIT_CANCELLED,
    }
}

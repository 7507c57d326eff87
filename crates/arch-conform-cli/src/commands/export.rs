//! Export command: render the dependency graph as DOT.

use anyhow::Result;
use std::path::Path;

use arch_conform::export_graph;

use super::{error_code, EXIT_OK};

/// Runs the export command.
pub fn run(path: &Path, focus: Option<&str>) -> Result<i32> {
    match export_graph(path, focus) {
        Ok(dot) => {
            print!("{dot}");
            Ok(EXIT_OK)
        }
        Err(error) => Ok(error_code(&error)),
    }
}

//! Init command: write a starter configuration.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# arch-conform configuration
# Namespace templates map file paths to module ids. A `*` segment matches
# exactly one path segment and is captured; rules can reference the same
# wildcard syntax.

# import-prefix = "example.com/app"

templates = [
    "internal/*/domain",
    "internal/*/application",
    "internal/*/infrastructure",
]

exclude = ["**/vendor/**", "**/testdata/**"]

# Layer rule: the domain layer stays free of infrastructure.

[[rules]]
type = "forbid-dependency"
name = "domain-purity"
from = "internal/*/domain"
to = "internal/*/infrastructure"

# One isolation rule per ordered pair of discovered domains.

[[rules]]
type = "pairwise-isolation"
template = "internal/*/domain"

# Naming rule: repositories declared in the domain are interfaces.

[[rules]]
type = "naming"
namespace = "internal/*/domain"
suffix = "Repository"
kind = "interface"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("arch-conform.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, CONFIG_TEMPLATE)?;

    println!("Created arch-conform.toml");
    println!();
    println!("Next steps:");
    println!("  1. Edit `templates` and [[rules]] for your project");
    println!("  2. Run: arch-conform run");

    Ok(())
}

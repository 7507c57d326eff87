//! arch-conform CLI tool.
//!
//! Usage:
//! ```bash
//! arch-conform check-layer [PATH] --layer "internal/*/domain" --forbidden "internal/*/infrastructure"
//! arch-conform check-isolation [PATH] --source "internal/user/" --target "internal/order/"
//! arch-conform check-naming [PATH] --namespace "internal/*/domain" --suffix Repository --kind interface
//! arch-conform run [PATH]
//! arch-conform export [PATH] --focus internal/user/domain
//! arch-conform init
//! ```
//!
//! Exit codes: 0 = completed pass, 1 = violations, 2 = setup error,
//! 3 = cancelled.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use arch_conform::SymbolKind;

mod commands;
mod config_resolver;

/// Namespace-based architecture conformance checks for source trees
#[derive(Parser)]
#[command(name = "arch-conform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a layer does not depend on a forbidden namespace
    CheckLayer {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Namespace pattern of the layer under test
        #[arg(long)]
        layer: String,

        /// Namespace pattern the layer must not depend on
        #[arg(long)]
        forbidden: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that one namespace is isolated from another
    CheckIsolation {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Source namespace pattern
        #[arg(long)]
        source: String,

        /// Target namespace pattern the source must not reach
        #[arg(long)]
        target: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that suffixed symbols in a namespace are of a required kind
    CheckNaming {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Namespace pattern to inspect
        #[arg(long)]
        namespace: String,

        /// Symbol name suffix (e.g. `Repository`)
        #[arg(long)]
        suffix: String,

        /// Required symbol kind
        #[arg(long)]
        kind: KindArg,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run every rule of the project configuration
    Run {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Warn when a rule's selector matches no modules
        #[arg(long)]
        warn_empty: bool,
    },

    /// Export the dependency graph as DOT
    Export {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Restrict the export to one module's neighborhood
        #[arg(long)]
        focus: Option<String>,
    },

    /// Initialize a configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Symbol kind argument.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    /// Interface declarations.
    Interface,
    /// Concrete type declarations.
    Struct,
    /// Free functions.
    Function,
}

impl From<KindArg> for SymbolKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Interface => SymbolKind::Interface,
            KindArg::Struct => SymbolKind::Struct,
            KindArg::Function => SymbolKind::Function,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::CheckLayer {
            path,
            layer,
            forbidden,
            format,
        } => commands::check::layer(&path, &layer, &forbidden, format)?,
        Commands::CheckIsolation {
            path,
            source,
            target,
            format,
        } => commands::check::isolation(&path, &source, &target, format)?,
        Commands::CheckNaming {
            path,
            namespace,
            suffix,
            kind,
            format,
        } => commands::check::naming(&path, &namespace, &suffix, kind.into(), format)?,
        Commands::Run {
            path,
            format,
            warn_empty,
        } => commands::run::run(&path, format, warn_empty, cli.config.as_deref())?,
        Commands::Export { path, focus } => commands::export::run(&path, focus.as_deref())?,
        Commands::Init { force } => {
            commands::init::run(force)?;
            commands::EXIT_OK
        }
    };

    std::process::exit(code)
}

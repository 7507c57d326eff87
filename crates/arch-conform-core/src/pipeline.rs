//! The scan → classify → build pipeline.
//!
//! Each invocation rebuilds the graph from scratch: no graph is ever
//! cached across runs. Graph construction is a strict single-writer phase
//! entered only after all extraction has completed; everything downstream
//! of [`build_graph`] is read-only.

use std::collections::BTreeSet;
use std::path::Path;

use crate::adapter::LanguageAdapter;
use crate::classify::Classifier;
use crate::config::{ConfigError, ProjectConfig, RuleSpec};
use crate::graph::{DependencyGraph, GraphBuilder, Module, ResolvedImport};
use crate::pattern::PatternError;
use crate::predicate::{pairwise_isolation, Rule};
use crate::report::{UnclassifiedFile, UnclassifiedReason};
use crate::scan::{scan, CancelToken, ScanError};

/// A fatal engine fault: the run aborts before producing results.
///
/// Setup errors are never expressed as violations: violations are
/// expected business outcomes, these are faults.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SetupError {
    /// The project root cannot be read.
    #[error("project root `{path}` is not readable: {source}")]
    UnreadableRoot {
        /// The root that failed.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// An include/exclude glob has invalid syntax.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Glob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },

    /// A namespace pattern has invalid syntax.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The project configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Terminal outcome of a failed pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Fatal setup fault.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// The caller aborted the run. Must not be read as pass or fail.
    #[error("run cancelled before completion")]
    Cancelled,
}

impl From<ScanError> for PipelineError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::Cancelled => Self::Cancelled,
            ScanError::UnreadableRoot { path, source } => {
                Self::Setup(SetupError::UnreadableRoot { path, source })
            }
            ScanError::BadGlob { pattern, source } => {
                Self::Setup(SetupError::Glob { pattern, source })
            }
        }
    }
}

impl From<PatternError> for PipelineError {
    fn from(e: PatternError) -> Self {
        Self::Setup(SetupError::Pattern(e))
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        Self::Setup(SetupError::Config(e))
    }
}

/// An immutable graph plus the diagnostics gathered while building it.
#[derive(Debug)]
pub struct GraphBundle {
    /// The dependency graph.
    pub graph: DependencyGraph,
    /// Files without a module assignment. Classification is total: every
    /// scanned file is in the graph or listed here.
    pub unclassified: Vec<UnclassifiedFile>,
}

/// Runs the scan-classify-build pipeline for one invocation.
///
/// # Errors
///
/// Returns [`PipelineError::Setup`] for fatal faults and
/// [`PipelineError::Cancelled`] when the token fires mid-scan.
pub fn build_graph(
    root: &Path,
    config: &ProjectConfig,
    adapters: &[Box<dyn LanguageAdapter>],
    cancel: &CancelToken,
) -> Result<GraphBundle, PipelineError> {
    let outcome = scan(root, adapters, &config.scan_options(), cancel)?;

    let classifier = Classifier::new(config.templates.clone(), config.import_prefix.clone());

    let mut unclassified = Vec::new();
    let mut classified = Vec::new();
    for file in outcome.files {
        match classifier.classify_file(&file.path) {
            Some(classification) => classified.push((file, classification.module)),
            None => unclassified.push(UnclassifiedFile {
                path: file.path,
                reason: UnclassifiedReason::NoMatchingTemplate,
            }),
        }
    }
    for warning in outcome.warnings {
        unclassified.push(UnclassifiedFile {
            path: warning.path,
            reason: UnclassifiedReason::ExtractionFailed {
                message: warning.message,
            },
        });
    }
    unclassified.sort_by(|a, b| a.path.cmp(&b.path));

    let known: BTreeSet<_> = classified.iter().map(|(_, m)| m.clone()).collect();

    let mut builder = GraphBuilder::new();
    for (file, module) in &classified {
        let imports: Vec<ResolvedImport> = file
            .imports
            .iter()
            .map(|import| ResolvedImport {
                target: classifier.resolve_import(&import.path, &known).module().clone(),
                line: import.line,
            })
            .collect();
        builder.add_file(module, file.path.clone(), &file.symbols, &imports);
    }
    let graph = builder.build();

    tracing::info!(
        modules = graph.module_count(),
        edges = graph.edge_count(),
        unclassified = unclassified.len(),
        "graph built"
    );

    Ok(GraphBundle {
        graph,
        unclassified,
    })
}

/// Expands rule specifications against a built graph: static rules pass
/// through, pairwise templates generate one isolation rule per ordered
/// pair of discovered namespaces.
#[must_use]
pub fn expand_rules(specs: &[RuleSpec], graph: &DependencyGraph) -> Vec<Rule> {
    let mut rules = Vec::new();
    for spec in specs {
        match spec {
            RuleSpec::Static(rule) => rules.push(rule.clone()),
            RuleSpec::Pairwise { template } => {
                rules.extend(pairwise_isolation(template, graph.modules().map(Module::id)));
            }
        }
    }
    rules
}

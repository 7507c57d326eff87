//! # arch-conform-core
//!
//! Core engine for namespace-based architecture conformance.
//!
//! The engine builds a module dependency graph from import relationships
//! and evaluates declarative rules against it:
//!
//! - [`scan`](scan::scan) walks a source tree and extracts imports and
//!   top-level symbols through a pluggable [`LanguageAdapter`]
//! - [`Classifier`] maps file paths to module ids via namespace templates
//!   with captured wildcards
//! - [`GraphBuilder`] folds the classified files into an immutable
//!   [`DependencyGraph`]
//! - the predicate module constructs immutable [`Rule`] values which
//!   [`evaluate`] interprets against the graph
//! - [`Report`] aggregates rule results; [`export_dot`] renders the graph
//!   for external visualization
//!
//! ## Example
//!
//! ```ignore
//! use arch_conform_core::{build_graph, evaluate, resides_in_namespace, has_dependency_on};
//!
//! let bundle = build_graph(root, &config, &adapters, &cancel)?;
//! let rule = resides_in_namespace("internal/*/domain")?
//!     .should_not(has_dependency_on("internal/*/infrastructure")?);
//! let result = evaluate(&bundle.graph, &rule);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod classify;
pub mod config;
pub mod eval;
pub mod export;
pub mod graph;
pub mod pattern;
pub mod pipeline;
pub mod predicate;
pub mod report;
pub mod scan;

pub use adapter::{ExtractError, ImportDecl, LanguageAdapter, SourceExtract, SymbolDecl, SymbolKind};
pub use classify::{Classification, Classifier, ImportTarget};
pub use config::{ConfigDto, ConfigError, ProjectConfig, RuleDto, RuleSpec};
pub use eval::{evaluate, evaluate_with, EvalOptions};
pub use export::export_dot;
pub use graph::{DependencyGraph, GraphBuilder, Module, ModuleId, Provenance, ResolvedImport, Symbol};
pub use pattern::{NamespacePattern, PatternError};
pub use pipeline::{build_graph, expand_rules, GraphBundle, PipelineError, SetupError};
pub use predicate::{
    has_dependency_on, has_kind, has_name_ending_with, is_interface_kind, name_ending_with,
    pairwise_isolation, resides_in_namespace, Assertion, Policy, Rule, Selector,
};
pub use report::{Report, RuleResult, UnclassifiedFile, UnclassifiedReason, Violation};
pub use scan::{
    scan, CancelToken, ExtractionWarning, ScanError, ScanOptions, ScanOutcome, SourceFile,
    DEFAULT_EXCLUDES,
};

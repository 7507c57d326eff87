//! # arch-conform
//!
//! Namespace-based architecture conformance for source trees.
//!
//! Given a project root, the engine builds a module dependency graph from
//! import relationships and evaluates declarative rules against it
//! ("modules matching X must not depend on modules matching Y", "symbols
//! matching X must be interfaces"), producing pass/fail verdicts with
//! precise violations.
//!
//! ## Example
//!
//! ```ignore
//! use arch_conform::check_layer_dependency;
//!
//! let result = check_layer_dependency(
//!     project_root,
//!     "internal/*/domain",
//!     "internal/*/infrastructure",
//! )?;
//! assert!(result.success(), "{}", result.format());
//! ```
//!
//! Rules can also be constructed directly and batched:
//!
//! ```ignore
//! use arch_conform::{resides_in_namespace, has_dependency_on, run_all};
//!
//! let rule = resides_in_namespace("internal/user/")?
//!     .should_not(has_dependency_on("internal/order/")?);
//! let report = run_all(project_root, &[rule])?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;

pub use api::{
    check_isolation, check_isolation_with, check_layer_dependency, check_layer_dependency_with,
    check_naming, check_naming_with, export_graph, export_graph_with, run_all, run_all_with,
    run_with_config,
};

pub use arch_conform_core::{
    evaluate, evaluate_with, export_dot, has_dependency_on, has_kind, has_name_ending_with,
    is_interface_kind, name_ending_with, pairwise_isolation, resides_in_namespace, Assertion,
    CancelToken, ConfigError, DependencyGraph, EvalOptions, LanguageAdapter, Module, ModuleId,
    NamespacePattern, PatternError, PipelineError, Policy, ProjectConfig, Report, Rule,
    RuleResult, RuleSpec, Selector, SetupError, SymbolKind, UnclassifiedFile, UnclassifiedReason,
    Violation,
};
pub use arch_conform_go::GoAdapter;

//! Synchronous entry points.
//!
//! Each call is an independent pipeline run: fresh scan, fresh graph,
//! fresh evaluation. No state is retained between invocations; a caller
//! that needs a complete, trustworthy result re-issues the full scan.

use std::path::Path;

use arch_conform_core::{
    build_graph, evaluate_with, expand_rules, export_dot, has_dependency_on, has_kind,
    has_name_ending_with, resides_in_namespace, CancelToken, EvalOptions, LanguageAdapter,
    ModuleId, NamespacePattern, PipelineError, ProjectConfig, Report, Rule, RuleResult,
    SymbolKind,
};
use arch_conform_go::GoAdapter;

/// Project config file names, checked in order.
const CONFIG_CANDIDATES: &[&str] = &["arch-conform.toml", ".arch-conform.toml"];

/// The adapters every entry point scans with.
fn default_adapters() -> Vec<Box<dyn LanguageAdapter>> {
    vec![Box::new(GoAdapter::new())]
}

/// Loads the project config if one exists; otherwise derives a config
/// whose classification templates are the given rule patterns, so
/// single-rule checks work on bare trees.
fn project_config(
    root: &Path,
    fallback_templates: &[&NamespacePattern],
) -> Result<ProjectConfig, PipelineError> {
    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return Ok(ProjectConfig::from_file(&path)?);
        }
    }

    let mut templates: Vec<NamespacePattern> = Vec::new();
    for pattern in fallback_templates {
        if !templates.contains(*pattern) {
            templates.push((*pattern).clone());
        }
    }
    Ok(ProjectConfig {
        templates,
        ..ProjectConfig::default()
    })
}

fn run_single(
    root: &Path,
    rule: &Rule,
    cancel: &CancelToken,
) -> Result<RuleResult, PipelineError> {
    let config = project_config(root, &rule.namespace_patterns())?;
    let bundle = build_graph(root, &config, &default_adapters(), cancel)?;
    Ok(evaluate_with(&bundle.graph, rule, EvalOptions::default()))
}

/// Checks that modules in `layer_pattern` do not depend on modules in
/// `forbidden_pattern`.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation; rule
/// violations are data inside the result, never errors.
pub fn check_layer_dependency(
    root: &Path,
    layer_pattern: &str,
    forbidden_pattern: &str,
) -> Result<RuleResult, PipelineError> {
    check_layer_dependency_with(root, layer_pattern, forbidden_pattern, &CancelToken::new())
}

/// [`check_layer_dependency`] with an explicit cancellation token.
///
/// # Errors
///
/// See [`check_layer_dependency`].
pub fn check_layer_dependency_with(
    root: &Path,
    layer_pattern: &str,
    forbidden_pattern: &str,
    cancel: &CancelToken,
) -> Result<RuleResult, PipelineError> {
    let rule = resides_in_namespace(layer_pattern)
        .map_err(PipelineError::from)?
        .should_not(has_dependency_on(forbidden_pattern).map_err(PipelineError::from)?);
    run_single(root, &rule, cancel)
}

/// Checks that modules in `source_pattern` are isolated from modules in
/// `target_pattern`.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation.
pub fn check_isolation(
    root: &Path,
    source_pattern: &str,
    target_pattern: &str,
) -> Result<RuleResult, PipelineError> {
    check_isolation_with(root, source_pattern, target_pattern, &CancelToken::new())
}

/// [`check_isolation`] with an explicit cancellation token.
///
/// # Errors
///
/// See [`check_isolation`].
pub fn check_isolation_with(
    root: &Path,
    source_pattern: &str,
    target_pattern: &str,
    cancel: &CancelToken,
) -> Result<RuleResult, PipelineError> {
    let rule = resides_in_namespace(source_pattern)
        .map_err(PipelineError::from)?
        .should_not(has_dependency_on(target_pattern).map_err(PipelineError::from)?)
        .with_id(format!("isolation {source_pattern} -> {target_pattern}"));
    run_single(root, &rule, cancel)
}

/// Checks that symbols under `namespace_pattern` whose names end with
/// `suffix` are of `required_kind`.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation.
pub fn check_naming(
    root: &Path,
    namespace_pattern: &str,
    suffix: &str,
    required_kind: SymbolKind,
) -> Result<RuleResult, PipelineError> {
    check_naming_with(
        root,
        namespace_pattern,
        suffix,
        required_kind,
        &CancelToken::new(),
    )
}

/// [`check_naming`] with an explicit cancellation token.
///
/// # Errors
///
/// See [`check_naming`].
pub fn check_naming_with(
    root: &Path,
    namespace_pattern: &str,
    suffix: &str,
    required_kind: SymbolKind,
    cancel: &CancelToken,
) -> Result<RuleResult, PipelineError> {
    let rule = resides_in_namespace(namespace_pattern)
        .map_err(PipelineError::from)?
        .and(has_name_ending_with(suffix))
        .should(has_kind(required_kind));
    run_single(root, &rule, cancel)
}

/// Evaluates a batch of rules in one scan and aggregates a report.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation.
pub fn run_all(root: &Path, rules: &[Rule]) -> Result<Report, PipelineError> {
    run_all_with(root, rules, &CancelToken::new(), EvalOptions::default())
}

/// [`run_all`] with an explicit cancellation token and evaluation options.
///
/// # Errors
///
/// See [`run_all`].
pub fn run_all_with(
    root: &Path,
    rules: &[Rule],
    cancel: &CancelToken,
    options: EvalOptions,
) -> Result<Report, PipelineError> {
    let fallback: Vec<&NamespacePattern> =
        rules.iter().flat_map(Rule::namespace_patterns).collect();
    let config = project_config(root, &fallback)?;

    let bundle = build_graph(root, &config, &default_adapters(), cancel)?;
    let results = rules
        .iter()
        .map(|rule| evaluate_with(&bundle.graph, rule, options))
        .collect();
    Ok(Report::new(results, bundle.unclassified))
}

/// Runs every rule of a loaded project configuration, expanding pairwise
/// templates against the discovered graph.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation.
pub fn run_with_config(
    root: &Path,
    config: &ProjectConfig,
    cancel: &CancelToken,
    options: EvalOptions,
) -> Result<Report, PipelineError> {
    let bundle = build_graph(root, config, &default_adapters(), cancel)?;
    let rules = expand_rules(&config.rules, &bundle.graph);
    let results = rules
        .iter()
        .map(|rule| evaluate_with(&bundle.graph, rule, options))
        .collect();
    Ok(Report::new(results, bundle.unclassified))
}

/// Renders the project's dependency graph (or `focus`'s neighborhood) as
/// a DOT digraph. Pure read-only export.
///
/// # Errors
///
/// Returns [`PipelineError`] for setup faults or cancellation.
pub fn export_graph(root: &Path, focus: Option<&str>) -> Result<String, PipelineError> {
    export_graph_with(root, focus, &CancelToken::new())
}

/// [`export_graph`] with an explicit cancellation token.
///
/// # Errors
///
/// See [`export_graph`].
pub fn export_graph_with(
    root: &Path,
    focus: Option<&str>,
    cancel: &CancelToken,
) -> Result<String, PipelineError> {
    let config = project_config(root, &[])?;
    let bundle = build_graph(root, &config, &default_adapters(), cancel)?;
    let focus_id = focus.map(ModuleId::new);
    Ok(export_dot(&bundle.graph, focus_id.as_ref()))
}

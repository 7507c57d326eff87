//! Rule evaluation against an immutable dependency graph.
//!
//! Evaluation is read-only and never short-circuits: the complete
//! violation set is collected in one pass so diagnostics are always full.
//! Errors (malformed patterns, missing graph) are setup faults raised at
//! construction time; evaluation itself only produces results.

use crate::graph::{DependencyGraph, Module, ModuleId};
use crate::pattern::NamespacePattern;
use crate::predicate::{Assertion, Policy, Rule, Selector};
use crate::report::{RuleResult, Violation};

/// Evaluation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Attach a warning to the result when the selector matches no module.
    ///
    /// An empty selection still reports success (vacuous truth); the
    /// warning exists because an empty selection usually means a
    /// misconfigured pattern.
    pub flag_empty_selection: bool,
}

/// Evaluates a rule with default options.
#[must_use]
pub fn evaluate(graph: &DependencyGraph, rule: &Rule) -> RuleResult {
    evaluate_with(graph, rule, EvalOptions::default())
}

/// Evaluates a rule against the graph.
///
/// 1. Resolve the selector against the graph's module set.
/// 2. Test the assertion against every selected module.
/// 3. Under [`Policy::Should`], every selected module must satisfy the
///    assertion; under [`Policy::ShouldNot`], none may.
///
/// An empty selection reports success by convention (vacuous truth).
#[must_use]
pub fn evaluate_with(graph: &DependencyGraph, rule: &Rule, options: EvalOptions) -> RuleResult {
    let selected: Vec<&Module> = graph
        .modules()
        .filter(|m| selector_matches(rule.selector(), m))
        .collect();

    tracing::debug!(
        rule = rule.id(),
        selected = selected.len(),
        "evaluating rule"
    );

    let mut warnings = Vec::new();
    if selected.is_empty() && options.flag_empty_selection {
        warnings.push(format!(
            "selector `{}` matched no modules; rule passes vacuously",
            rule.selector()
        ));
    }

    let suffixes = selector_suffixes(rule.selector());
    let mut violations = Vec::new();
    for module in &selected {
        check_module(graph, module, rule, &suffixes, &mut violations);
    }

    RuleResult::new(rule.id(), violations, warnings)
}

/// Tests whether a module is chosen by the selector.
///
/// External modules never match namespace selectors unless the pattern
/// targets `external:` explicitly.
fn selector_matches(selector: &Selector, module: &Module) -> bool {
    match selector {
        Selector::ResidesInNamespace(pattern) => {
            if module.is_external() && !pattern.targets_external() {
                return false;
            }
            pattern.matches(module.id().as_str())
        }
        Selector::HasNameEndingWith(suffix) => {
            module.symbols().any(|s| s.name.ends_with(suffix))
        }
        Selector::And(a, b) => selector_matches(a, module) && selector_matches(b, module),
        Selector::Or(a, b) => selector_matches(a, module) || selector_matches(b, module),
    }
}

/// Name suffixes appearing in the selector. Structural assertions focus on
/// the symbols that made the module selected; with no name constraint they
/// apply to every symbol.
fn selector_suffixes(selector: &Selector) -> Vec<String> {
    fn walk(selector: &Selector, out: &mut Vec<String>) {
        match selector {
            Selector::ResidesInNamespace(_) => {}
            Selector::HasNameEndingWith(s) => out.push(s.clone()),
            Selector::And(a, b) | Selector::Or(a, b) => {
                walk(a, out);
                walk(b, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(selector, &mut out);
    out
}

fn target_matches(pattern: &NamespacePattern, target: &ModuleId) -> bool {
    if target.is_external() && !pattern.targets_external() {
        return false;
    }
    pattern.matches(target.as_str())
}

fn check_module(
    graph: &DependencyGraph,
    module: &Module,
    rule: &Rule,
    suffixes: &[String],
    violations: &mut Vec<Violation>,
) {
    match rule.assertion() {
        Assertion::HasDependencyOn(pattern) => {
            check_dependency(graph, module, rule.policy(), pattern, violations);
        }
        Assertion::HasKind(kind) => {
            for symbol in focus_symbols(module, suffixes) {
                match rule.policy() {
                    Policy::Should if symbol.kind != *kind => violations.push(Violation {
                        module: module.id().clone(),
                        file: Some(symbol.file.clone()),
                        line: Some(symbol.line),
                        target: None,
                        reason: format!(
                            "symbol `{}` is a {} but must be a {kind}",
                            symbol.name, symbol.kind
                        ),
                    }),
                    Policy::ShouldNot if symbol.kind == *kind => violations.push(Violation {
                        module: module.id().clone(),
                        file: Some(symbol.file.clone()),
                        line: Some(symbol.line),
                        target: None,
                        reason: format!("symbol `{}` must not be a {kind}", symbol.name),
                    }),
                    _ => {}
                }
            }
        }
        Assertion::NameEndsWith(suffix) => {
            for symbol in focus_symbols(module, suffixes) {
                let ends = symbol.name.ends_with(suffix);
                match rule.policy() {
                    Policy::Should if !ends => violations.push(Violation {
                        module: module.id().clone(),
                        file: Some(symbol.file.clone()),
                        line: Some(symbol.line),
                        target: None,
                        reason: format!(
                            "symbol `{}` does not end with `{suffix}`",
                            symbol.name
                        ),
                    }),
                    Policy::ShouldNot if ends => violations.push(Violation {
                        module: module.id().clone(),
                        file: Some(symbol.file.clone()),
                        line: Some(symbol.line),
                        target: None,
                        reason: format!("symbol `{}` must not end with `{suffix}`", symbol.name),
                    }),
                    _ => {}
                }
            }
        }
    }
}

fn check_dependency(
    graph: &DependencyGraph,
    module: &Module,
    policy: Policy,
    pattern: &NamespacePattern,
    violations: &mut Vec<Violation>,
) {
    let matching: Vec<_> = graph
        .edges_from(module.id())
        .filter(|(target, _)| target_matches(pattern, target))
        .collect();

    match policy {
        Policy::Should => {
            if matching.is_empty() {
                violations.push(Violation {
                    module: module.id().clone(),
                    file: None,
                    line: None,
                    target: None,
                    reason: format!("expected a dependency on `{pattern}`"),
                });
            }
        }
        Policy::ShouldNot => {
            for (target, provenance) in matching {
                for origin in provenance {
                    violations.push(Violation {
                        module: module.id().clone(),
                        file: Some(origin.file.clone()),
                        line: Some(origin.line),
                        target: Some(target.clone()),
                        reason: format!("forbidden dependency on `{target}`"),
                    });
                }
            }
        }
    }
}

fn focus_symbols<'a>(
    module: &'a Module,
    suffixes: &'a [String],
) -> impl Iterator<Item = &'a crate::graph::Symbol> {
    module.symbols().filter(move |symbol| {
        suffixes.is_empty() || suffixes.iter().any(|s| symbol.name.ends_with(s))
    })
}

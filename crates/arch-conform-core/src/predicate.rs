//! Declarative rule construction.
//!
//! Rules are immutable expression trees: a selector predicate choosing the
//! module subset under test, an assertion predicate tested per selected
//! module, and a quantifier policy. Construction is pure: no graph access
//! happens until [`evaluate`](crate::eval::evaluate) is invoked, so rules
//! can be introspected, serialized, and batched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adapter::SymbolKind;
use crate::graph::ModuleId;
use crate::pattern::{NamespacePattern, PatternError};

/// Selector predicate: chooses the module subset a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Modules whose id matches the namespace pattern.
    ResidesInNamespace(NamespacePattern),
    /// Modules declaring at least one symbol whose name ends with the suffix.
    HasNameEndingWith(String),
    /// Both sub-selectors match.
    And(Box<Selector>, Box<Selector>),
    /// Either sub-selector matches.
    Or(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// Combines two selectors conjunctively.
    #[must_use]
    pub fn and(self, other: Selector) -> Selector {
        Selector::And(Box::new(self), Box::new(other))
    }

    /// Combines two selectors disjunctively.
    #[must_use]
    pub fn or(self, other: Selector) -> Selector {
        Selector::Or(Box::new(self), Box::new(other))
    }

    /// Builds a rule requiring the assertion to hold for *every* selected
    /// module (universal quantifier; a single passing module is never
    /// enough).
    #[must_use]
    pub fn should(self, assertion: Assertion) -> Rule {
        Rule::new(self, Policy::Should, assertion)
    }

    /// Builds a rule requiring the assertion to hold for *no* selected
    /// module.
    #[must_use]
    pub fn should_not(self, assertion: Assertion) -> Rule {
        Rule::new(self, Policy::ShouldNot, assertion)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResidesInNamespace(p) => write!(f, "resides-in({p})"),
            Self::HasNameEndingWith(s) => write!(f, "name-ends-with({s})"),
            Self::And(a, b) => write!(f, "{a} and {b}"),
            Self::Or(a, b) => write!(f, "{a} or {b}"),
        }
    }
}

/// Assertion predicate: tested against each selected module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assertion {
    /// At least one outgoing edge targets a module matching the pattern.
    HasDependencyOn(NamespacePattern),
    /// The module's matched symbols are of the given kind.
    HasKind(SymbolKind),
    /// The module's matched symbols have names ending with the suffix.
    NameEndsWith(String),
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasDependencyOn(p) => write!(f, "depend-on({p})"),
            Self::HasKind(k) => write!(f, "be-kind({k})"),
            Self::NameEndsWith(s) => write!(f, "have-name-ending({s})"),
        }
    }
}

/// Quantifier policy of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// The assertion must hold for every selected module.
    Should,
    /// The assertion must hold for no selected module.
    ShouldNot,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Should => write!(f, "should"),
            Self::ShouldNot => write!(f, "should-not"),
        }
    }
}

/// An immutable conformance rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    id: String,
    selector: Selector,
    policy: Policy,
    assertion: Assertion,
}

impl Rule {
    /// Creates a rule with a derived id.
    #[must_use]
    pub fn new(selector: Selector, policy: Policy, assertion: Assertion) -> Self {
        let id = format!("{selector} {policy} {assertion}");
        Self {
            id,
            selector,
            policy,
            assertion,
        }
    }

    /// Replaces the derived id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the rule id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the selector predicate.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Returns the quantifier policy.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Returns the assertion predicate.
    #[must_use]
    pub fn assertion(&self) -> &Assertion {
        &self.assertion
    }

    /// All namespace patterns referenced by this rule, selector and
    /// assertion alike. Used to derive classification templates when no
    /// project configuration exists.
    #[must_use]
    pub fn namespace_patterns(&self) -> Vec<&NamespacePattern> {
        let mut out = Vec::new();
        collect_selector_patterns(&self.selector, &mut out);
        if let Assertion::HasDependencyOn(p) = &self.assertion {
            out.push(p);
        }
        out
    }
}

fn collect_selector_patterns<'a>(selector: &'a Selector, out: &mut Vec<&'a NamespacePattern>) {
    match selector {
        Selector::ResidesInNamespace(p) => out.push(p),
        Selector::HasNameEndingWith(_) => {}
        Selector::And(a, b) | Selector::Or(a, b) => {
            collect_selector_patterns(a, out);
            collect_selector_patterns(b, out);
        }
    }
}

/// Selector: modules residing in a namespace.
///
/// # Errors
///
/// Returns [`PatternError`] for malformed pattern syntax: a setup fault,
/// never a violation.
pub fn resides_in_namespace(pattern: &str) -> Result<Selector, PatternError> {
    Ok(Selector::ResidesInNamespace(NamespacePattern::parse(
        pattern,
    )?))
}

/// Selector: modules declaring a symbol whose name ends with `suffix`.
#[must_use]
pub fn has_name_ending_with(suffix: &str) -> Selector {
    Selector::HasNameEndingWith(suffix.to_string())
}

/// Assertion: the module depends on a namespace.
///
/// # Errors
///
/// Returns [`PatternError`] for malformed pattern syntax.
pub fn has_dependency_on(pattern: &str) -> Result<Assertion, PatternError> {
    Ok(Assertion::HasDependencyOn(NamespacePattern::parse(
        pattern,
    )?))
}

/// Assertion: matched symbols are of the given kind.
#[must_use]
pub fn has_kind(kind: SymbolKind) -> Assertion {
    Assertion::HasKind(kind)
}

/// Assertion: matched symbols are interfaces.
#[must_use]
pub fn is_interface_kind() -> Assertion {
    Assertion::HasKind(SymbolKind::Interface)
}

/// Assertion: matched symbols have names ending with `suffix`.
#[must_use]
pub fn name_ending_with(suffix: &str) -> Assertion {
    Assertion::NameEndsWith(suffix.to_string())
}

/// Generates one isolation rule per ordered pair of namespaces discovered
/// by instantiating `template` against the given module ids.
///
/// `template` must contain at least one `*` segment; its captures identify
/// the variants (e.g. the domain names under `internal/*/domain`). Each
/// generated rule forbids dependencies from one variant's namespace prefix
/// onto another's.
#[must_use]
pub fn pairwise_isolation<'a>(
    template: &NamespacePattern,
    module_ids: impl Iterator<Item = &'a ModuleId>,
) -> Vec<Rule> {
    let mut variants: Vec<Vec<String>> = Vec::new();
    for id in module_ids {
        if let Some(captures) = template.captures(id.as_str()) {
            if !captures.is_empty() && !variants.contains(&captures) {
                variants.push(captures);
            }
        }
    }
    variants.sort();

    let mut rules = Vec::new();
    for source in &variants {
        for target in &variants {
            if source == target {
                continue;
            }
            let source_refs: Vec<&str> = source.iter().map(String::as_str).collect();
            let target_refs: Vec<&str> = target.iter().map(String::as_str).collect();
            let source_ns = format!("{}/", template.substitute(&source_refs));
            let target_ns = format!("{}/", template.substitute(&target_refs));

            let Ok(selector) = resides_in_namespace(&source_ns) else {
                continue;
            };
            let Ok(assertion) = has_dependency_on(&target_ns) else {
                continue;
            };
            rules.push(
                selector
                    .should_not(assertion)
                    .with_id(format!("isolation {source_ns} -> {target_ns}")),
            );
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_construction_is_pure_and_immutable() {
        let rule = resides_in_namespace("internal/*/domain")
            .unwrap()
            .should_not(has_dependency_on("internal/*/infrastructure").unwrap());
        assert_eq!(rule.policy(), Policy::ShouldNot);
        assert_eq!(
            rule.id(),
            "resides-in(internal/*/domain) should-not depend-on(internal/*/infrastructure)"
        );
    }

    #[test]
    fn with_id_overrides_derived_id() {
        let rule = resides_in_namespace("internal/user/")
            .unwrap()
            .should_not(has_dependency_on("internal/order/").unwrap())
            .with_id("user-order-isolation");
        assert_eq!(rule.id(), "user-order-isolation");
    }

    #[test]
    fn malformed_pattern_is_a_construction_error() {
        assert!(resides_in_namespace("").is_err());
        assert!(has_dependency_on("a//b").is_err());
    }

    #[test]
    fn combinators_build_nested_selectors() {
        let s = resides_in_namespace("internal/*/domain")
            .unwrap()
            .and(has_name_ending_with("Repository"));
        assert!(matches!(s, Selector::And(_, _)));
        assert_eq!(
            s.to_string(),
            "resides-in(internal/*/domain) and name-ends-with(Repository)"
        );
    }

    #[test]
    fn namespace_patterns_collects_selector_and_assertion() {
        let rule = resides_in_namespace("internal/*/domain")
            .unwrap()
            .should_not(has_dependency_on("internal/*/infrastructure").unwrap());
        let patterns: Vec<&str> = rule
            .namespace_patterns()
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(
            patterns,
            vec!["internal/*/domain", "internal/*/infrastructure"]
        );
    }

    #[test]
    fn rule_serializes_and_round_trips() {
        let rule = resides_in_namespace("internal/*/domain")
            .unwrap()
            .and(has_name_ending_with("Repository"))
            .should(is_interface_kind())
            .with_id("repositories-are-interfaces");
        let json = serde_json::to_string(&rule).unwrap();
        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn pairwise_isolation_generates_ordered_pairs() {
        let template = NamespacePattern::parse("internal/*/domain").unwrap();
        let ids = [
            ModuleId::new("internal/user/domain"),
            ModuleId::new("internal/order/domain"),
            ModuleId::new("internal/user/infrastructure"),
        ];
        let rules = pairwise_isolation(&template, ids.iter());
        // two variants (order, user) -> two ordered pairs
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id(), "isolation internal/order/domain/ -> internal/user/domain/");
        assert_eq!(rules[1].id(), "isolation internal/user/domain/ -> internal/order/domain/");
    }

    #[test]
    fn pairwise_isolation_with_single_variant_is_empty() {
        let template = NamespacePattern::parse("internal/*/domain").unwrap();
        let ids = [ModuleId::new("internal/user/domain")];
        assert!(pairwise_isolation(&template, ids.iter()).is_empty());
    }
}

//! Module classification: maps file paths and import strings to module ids.
//!
//! A namespace template (`internal/*/domain`) matches a *prefix* of a
//! file's directory segments; the module id is that concrete prefix with
//! captures substituted. When several templates could match, the most
//! specific one wins: most literal segments first, then more total
//! segments, then declaration order.

use std::collections::BTreeSet;
use std::path::Path;

use crate::graph::ModuleId;
use crate::pattern::NamespacePattern;

/// Result of classifying a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The owning module id.
    pub module: ModuleId,
    /// Values captured by the template's `*` segments.
    pub captures: Vec<String>,
}

/// Result of resolving a raw import string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// The import resolves inside the project.
    Local(ModuleId),
    /// The import resolves outside the project root.
    External(ModuleId),
}

impl ImportTarget {
    /// Returns the target module id either way.
    #[must_use]
    pub fn module(&self) -> &ModuleId {
        match self {
            Self::Local(id) | Self::External(id) => id,
        }
    }
}

/// Maps file paths to module ids via namespace templates, and raw import
/// strings to local or external target modules.
#[derive(Debug, Clone)]
pub struct Classifier {
    templates: Vec<NamespacePattern>,
    import_prefix: Option<String>,
}

impl Classifier {
    /// Creates a classifier.
    ///
    /// `import_prefix` is the project's import root (e.g. the Go module
    /// path); imports under it are project-relative. With an empty
    /// template list the classifier falls back to directory identity:
    /// each directory is its own module.
    #[must_use]
    pub fn new(templates: Vec<NamespacePattern>, import_prefix: Option<String>) -> Self {
        Self {
            templates,
            import_prefix,
        }
    }

    /// Returns the configured templates.
    #[must_use]
    pub fn templates(&self) -> &[NamespacePattern] {
        &self.templates
    }

    /// Classifies a file path (relative to the project root).
    ///
    /// Returns `None` when no template matches; the caller records the
    /// file as unclassified, it is never silently dropped.
    #[must_use]
    pub fn classify_file(&self, path: &Path) -> Option<Classification> {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let segments: Vec<&str> = dir
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        if self.templates.is_empty() {
            let id = if segments.is_empty() {
                ".".to_string()
            } else {
                segments.join("/")
            };
            return Some(Classification {
                module: ModuleId::new(id),
                captures: Vec::new(),
            });
        }

        self.classify_segments(&segments)
    }

    /// Resolves a raw import string against the project.
    ///
    /// `known` is the set of module ids discovered by file classification;
    /// it settles project-relative imports that match no template.
    #[must_use]
    pub fn resolve_import(&self, raw: &str, known: &BTreeSet<ModuleId>) -> ImportTarget {
        let relative = match &self.import_prefix {
            Some(prefix) => {
                if raw == prefix {
                    ""
                } else if let Some(rest) = raw.strip_prefix(&format!("{prefix}/")) {
                    rest
                } else {
                    return ImportTarget::External(external_of(raw));
                }
            }
            None => raw,
        };

        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return ImportTarget::External(external_of(raw));
        }

        if let Some(classification) = self.classify_segments(&segments) {
            return ImportTarget::Local(classification.module);
        }

        // Longest known-module prefix of the import path
        for len in (1..=segments.len()).rev() {
            let candidate = ModuleId::new(segments[..len].join("/"));
            if known.contains(&candidate) {
                return ImportTarget::Local(candidate);
            }
        }

        if self.import_prefix.is_some() {
            // Under the project prefix but unknown: still a local module
            return ImportTarget::Local(ModuleId::new(segments.join("/")));
        }

        ImportTarget::External(external_of(raw))
    }

    /// Matches templates against directory segments, picking the most
    /// specific prefix match.
    fn classify_segments(&self, segments: &[&str]) -> Option<Classification> {
        let mut best: Option<(usize, usize, Classification)> = None;

        // Earlier templates win ties: a later candidate must be strictly
        // more specific to replace the current best.
        for template in &self.templates {
            let Some((prefix_len, captures)) = match_prefix(template, segments) else {
                continue;
            };
            let (literals, total) = (template.literal_count(), template.segment_count());
            let better = match &best {
                None => true,
                Some((best_lit, best_total, _)) => {
                    literals > *best_lit || (literals == *best_lit && total > *best_total)
                }
            };
            if better {
                best = Some((
                    literals,
                    total,
                    Classification {
                        module: ModuleId::new(segments[..prefix_len].join("/")),
                        captures,
                    },
                ));
            }
        }

        best.map(|(_, _, c)| c)
    }
}

/// Synthetic external module for an import: `external:<first segment>`.
fn external_of(raw: &str) -> ModuleId {
    let root = raw.split('/').next().unwrap_or(raw);
    ModuleId::external(root)
}

/// Matches a template against the shortest matching prefix of `segments`.
///
/// Returns the prefix length and the captured `*` values.
fn match_prefix(template: &NamespacePattern, segments: &[&str]) -> Option<(usize, Vec<String>)> {
    for len in 1..=segments.len() {
        let prefix = segments[..len].join("/");
        if let Some(captures) = template.captures(&prefix) {
            return Some((len, captures));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(patterns: &[&str]) -> Vec<NamespacePattern> {
        patterns
            .iter()
            .map(|p| NamespacePattern::parse(p).unwrap())
            .collect()
    }

    fn classifier(patterns: &[&str]) -> Classifier {
        Classifier::new(templates(patterns), None)
    }

    #[test]
    fn classifies_file_under_template() {
        let c = classifier(&["internal/*/domain"]);
        let result = c
            .classify_file(Path::new("internal/user/domain/entity.go"))
            .unwrap();
        assert_eq!(result.module, ModuleId::new("internal/user/domain"));
        assert_eq!(result.captures, vec!["user".to_string()]);
    }

    #[test]
    fn classifies_nested_file_to_template_prefix() {
        let c = classifier(&["internal/*/domain"]);
        let result = c
            .classify_file(Path::new("internal/user/domain/model/value.go"))
            .unwrap();
        assert_eq!(result.module, ModuleId::new("internal/user/domain"));
    }

    #[test]
    fn unmatched_file_returns_none() {
        let c = classifier(&["internal/*/domain"]);
        assert!(c.classify_file(Path::new("cmd/server/main.go")).is_none());
    }

    #[test]
    fn most_specific_template_wins() {
        // "internal/user/domain" (3 literals) beats "internal/*/domain" (2)
        let c = classifier(&["internal/*/domain", "internal/user/domain"]);
        let result = c
            .classify_file(Path::new("internal/user/domain/entity.go"))
            .unwrap();
        assert!(result.captures.is_empty());
    }

    #[test]
    fn longer_template_wins_on_equal_literals() {
        let c = classifier(&["internal/*", "internal/*/domain"]);
        let result = c
            .classify_file(Path::new("internal/user/domain/entity.go"))
            .unwrap();
        assert_eq!(result.module, ModuleId::new("internal/user/domain"));
    }

    #[test]
    fn empty_template_list_uses_directory_identity() {
        let c = classifier(&[]);
        let result = c.classify_file(Path::new("a/x.go")).unwrap();
        assert_eq!(result.module, ModuleId::new("a"));

        let root = c.classify_file(Path::new("main.go")).unwrap();
        assert_eq!(root.module, ModuleId::new("."));
    }

    #[test]
    fn resolve_import_via_template() {
        let c = classifier(&["internal/*/domain", "internal/*/infrastructure"]);
        let target = c.resolve_import("internal/user/infrastructure/db", &BTreeSet::new());
        assert_eq!(
            target,
            ImportTarget::Local(ModuleId::new("internal/user/infrastructure"))
        );
    }

    #[test]
    fn resolve_import_strips_project_prefix() {
        let c = Classifier::new(
            templates(&["internal/*/domain"]),
            Some("example.com/shop".to_string()),
        );
        let target = c.resolve_import("example.com/shop/internal/user/domain", &BTreeSet::new());
        assert_eq!(
            target,
            ImportTarget::Local(ModuleId::new("internal/user/domain"))
        );
    }

    #[test]
    fn resolve_import_outside_prefix_is_external() {
        let c = Classifier::new(
            templates(&["internal/*/domain"]),
            Some("example.com/shop".to_string()),
        );
        let target = c.resolve_import("github.com/pkg/errors", &BTreeSet::new());
        assert_eq!(
            target,
            ImportTarget::External(ModuleId::external("github.com"))
        );
        let std = c.resolve_import("fmt", &BTreeSet::new());
        assert_eq!(std, ImportTarget::External(ModuleId::external("fmt")));
    }

    #[test]
    fn resolve_import_against_known_modules() {
        let c = classifier(&[]);
        let known: BTreeSet<ModuleId> = [ModuleId::new("b")].into_iter().collect();
        assert_eq!(
            c.resolve_import("b", &known),
            ImportTarget::Local(ModuleId::new("b"))
        );
        assert_eq!(
            c.resolve_import("fmt", &known),
            ImportTarget::External(ModuleId::external("fmt"))
        );
    }

    #[test]
    fn resolve_import_longest_known_prefix() {
        let c = classifier(&[]);
        let known: BTreeSet<ModuleId> = [ModuleId::new("pkg"), ModuleId::new("pkg/util")]
            .into_iter()
            .collect();
        assert_eq!(
            c.resolve_import("pkg/util/strings", &known),
            ImportTarget::Local(ModuleId::new("pkg/util"))
        );
    }

    #[test]
    fn resolve_unknown_under_prefix_stays_local() {
        let c = Classifier::new(templates(&[]), Some("example.com/shop".to_string()));
        let target = c.resolve_import("example.com/shop/pkg/telemetry", &BTreeSet::new());
        assert_eq!(target, ImportTarget::Local(ModuleId::new("pkg/telemetry")));
    }
}

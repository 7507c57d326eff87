//! TOML project configuration.
//!
//! DTO types exist solely for serde deserialization; they are converted to
//! validated domain values (`ProjectConfig`, rule ASTs) by the loader. All
//! pattern syntax errors surface at load time with field context.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::adapter::SymbolKind;
use crate::pattern::{NamespacePattern, PatternError};
use crate::predicate::{
    has_dependency_on, has_kind, has_name_ending_with, resides_in_namespace, Rule,
};
use crate::scan::{ScanOptions, DEFAULT_EXCLUDES};

/// Raw TOML representation of a project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDto {
    /// Project root, relative to the config file's directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Project import root (e.g. the Go module path).
    #[serde(rename = "import-prefix", default)]
    pub import_prefix: Option<String>,

    /// Include globs; empty means everything.
    #[serde(default)]
    pub include: Vec<String>,

    /// Exclude globs; empty means the built-in defaults.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Namespace templates mapping file paths to module ids.
    #[serde(default)]
    pub templates: Vec<String>,

    /// Rule definitions.
    #[serde(rename = "rules", default)]
    pub rules: Vec<RuleDto>,
}

/// Raw TOML representation of one rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuleDto {
    /// `from` must not depend on `to`.
    ForbidDependency {
        /// Optional rule name.
        #[serde(default)]
        name: Option<String>,
        /// Selector namespace pattern.
        from: String,
        /// Forbidden target namespace pattern.
        to: String,
    },

    /// Every module in `from` must depend on `to`.
    RequireDependency {
        /// Optional rule name.
        #[serde(default)]
        name: Option<String>,
        /// Selector namespace pattern.
        from: String,
        /// Required target namespace pattern.
        to: String,
    },

    /// `source` must not depend on `target` (and nothing else is implied).
    Isolation {
        /// Optional rule name.
        #[serde(default)]
        name: Option<String>,
        /// Source namespace pattern.
        source: String,
        /// Target namespace pattern.
        target: String,
    },

    /// One isolation rule per ordered pair of namespaces discovered by
    /// instantiating `template` against the graph.
    PairwiseIsolation {
        /// Optional rule name prefix.
        #[serde(default)]
        name: Option<String>,
        /// Template with at least one `*` segment and no `**`.
        template: String,
    },

    /// Symbols with `suffix` under `namespace` must be of `kind`.
    Naming {
        /// Optional rule name.
        #[serde(default)]
        name: Option<String>,
        /// Selector namespace pattern.
        namespace: String,
        /// Symbol name suffix.
        suffix: String,
        /// Required symbol kind: `interface`, `struct` or `function`.
        kind: String,
    },
}

/// A validated rule specification.
///
/// Pairwise rules stay symbolic until a graph exists to discover the
/// namespace variants from.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// A fully constructed rule.
    Static(Rule),
    /// Expanded against the graph's module set at evaluation time.
    Pairwise {
        /// Template with captured wildcard segments.
        template: NamespacePattern,
    },
}

/// Validated project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root.
    pub root: PathBuf,
    /// Project import root.
    pub import_prefix: Option<String>,
    /// Include globs.
    pub include: Vec<String>,
    /// Exclude globs.
    pub exclude: Vec<String>,
    /// Namespace templates.
    pub templates: Vec<NamespacePattern>,
    /// Rule specifications.
    pub rules: Vec<RuleSpec>,
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// A namespace pattern failed validation.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the pattern appeared (e.g. `rules[2].from`).
        context: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// Unknown symbol kind string.
    #[error("{context}: unknown kind `{value}`, expected: interface, struct, function")]
    UnknownKind {
        /// Where the kind appeared.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// A pairwise template without a capturable wildcard.
    #[error("rules[{index}].template `{template}` must contain `*` and no `**`")]
    PairwiseTemplate {
        /// Rule index.
        index: usize,
        /// The offending template.
        template: String,
    },
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            import_prefix: None,
            include: Vec::new(),
            exclude: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
            templates: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for IO, TOML or validation failures.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for TOML or validation failures.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let dto: ConfigDto = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Self::from_dto(dto)
    }

    /// Converts a DTO into a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed patterns or kinds.
    pub fn from_dto(dto: ConfigDto) -> Result<Self, ConfigError> {
        let templates = dto
            .templates
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                NamespacePattern::parse(raw).map_err(|source| ConfigError::Pattern {
                    context: format!("templates[{i}]"),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rules = dto
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| convert_rule(rule, i))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude = if dto.exclude.is_empty() {
            DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect()
        } else {
            dto.exclude
        };

        Ok(Self {
            root: dto.root.unwrap_or_else(|| PathBuf::from(".")),
            import_prefix: dto.import_prefix,
            include: dto.include,
            exclude,
            templates,
            rules,
        })
    }

    /// Scan options derived from this configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

fn pattern_at(raw: &str, context: String) -> Result<NamespacePattern, ConfigError> {
    NamespacePattern::parse(raw).map_err(|source| ConfigError::Pattern { context, source })
}

fn convert_rule(dto: RuleDto, index: usize) -> Result<RuleSpec, ConfigError> {
    match dto {
        RuleDto::ForbidDependency { name, from, to } => {
            let selector = selector_at(&from, format!("rules[{index}].from"))?;
            let assertion = assertion_at(&to, format!("rules[{index}].to"))?;
            Ok(RuleSpec::Static(named(selector.should_not(assertion), name)))
        }
        RuleDto::RequireDependency { name, from, to } => {
            let selector = selector_at(&from, format!("rules[{index}].from"))?;
            let assertion = assertion_at(&to, format!("rules[{index}].to"))?;
            Ok(RuleSpec::Static(named(selector.should(assertion), name)))
        }
        RuleDto::Isolation {
            name,
            source,
            target,
        } => {
            let selector = selector_at(&source, format!("rules[{index}].source"))?;
            let assertion = assertion_at(&target, format!("rules[{index}].target"))?;
            Ok(RuleSpec::Static(named(selector.should_not(assertion), name)))
        }
        RuleDto::PairwiseIsolation { name: _, template } => {
            let pattern = pattern_at(&template, format!("rules[{index}].template"))?;
            if pattern.wildcard_count() == 0 || pattern.has_globstar() {
                return Err(ConfigError::PairwiseTemplate { index, template });
            }
            Ok(RuleSpec::Pairwise { template: pattern })
        }
        RuleDto::Naming {
            name,
            namespace,
            suffix,
            kind,
        } => {
            let selector = selector_at(&namespace, format!("rules[{index}].namespace"))?
                .and(has_name_ending_with(&suffix));
            let kind = parse_kind(&kind, format!("rules[{index}].kind"))?;
            Ok(RuleSpec::Static(named(selector.should(has_kind(kind)), name)))
        }
    }
}

fn selector_at(
    raw: &str,
    context: String,
) -> Result<crate::predicate::Selector, ConfigError> {
    resides_in_namespace(raw).map_err(|source| ConfigError::Pattern { context, source })
}

fn assertion_at(
    raw: &str,
    context: String,
) -> Result<crate::predicate::Assertion, ConfigError> {
    has_dependency_on(raw).map_err(|source| ConfigError::Pattern { context, source })
}

fn named(rule: Rule, name: Option<String>) -> Rule {
    match name {
        Some(name) => rule.with_id(name),
        None => rule,
    }
}

fn parse_kind(value: &str, context: String) -> Result<SymbolKind, ConfigError> {
    match value {
        "interface" => Ok(SymbolKind::Interface),
        "struct" => Ok(SymbolKind::Struct),
        "function" => Ok(SymbolKind::Function),
        _ => Err(ConfigError::UnknownKind {
            context,
            value: value.to_string(),
        }),
    }
}

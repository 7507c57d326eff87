//! Rule results, diagnostics, and the aggregated report.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use time::OffsetDateTime;

use crate::graph::ModuleId;

/// A concrete case where a module fails a rule's assertion.
///
/// Violations are expected business data, never errors: they are always
/// carried inside a [`RuleResult`], never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The module that failed the assertion.
    pub module: ModuleId,
    /// Originating file, when the violation has edge or symbol provenance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Line in the originating file (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Offending target module, for dependency violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ModuleId>,
    /// Human-readable explanation.
    pub reason: String,
}

impl Violation {
    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = format!("{}", self.module);
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            let _ = write!(out, " at {}:{line}", file.display());
        }
        let _ = write!(out, ": {}", self.reason);
        out
    }
}

/// Outcome of evaluating one rule against the graph.
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    rule_id: String,
    success: bool,
    violations: Vec<Violation>,
    warnings: Vec<String>,
}

impl RuleResult {
    /// Creates a result. `success` is derived: true iff no violations.
    #[must_use]
    pub fn new(rule_id: impl Into<String>, violations: Vec<Violation>, warnings: Vec<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            success: violations.is_empty(),
            violations,
            warnings,
        }
    }

    /// Id of the evaluated rule.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Whether the rule passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Violations, in deterministic order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Non-fatal notices (e.g. an empty selection when the caller asked to
    /// be told about it).
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Formats the result for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        let verdict = if self.success { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "{verdict} {}", self.rule_id);
        for warning in &self.warnings {
            let _ = writeln!(out, "  warning: {warning}");
        }
        for violation in &self.violations {
            let _ = writeln!(out, "  {}", violation.format());
        }
        out
    }
}

/// Why a scanned file has no module assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UnclassifiedReason {
    /// No namespace template matched the file path.
    NoMatchingTemplate,
    /// The language adapter could not extract the file.
    ExtractionFailed {
        /// Adapter error message.
        message: String,
    },
}

/// A scanned file that could not be classified into a module.
///
/// Classification is total: every scanned file is either assigned exactly
/// one module or listed here, never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedFile {
    /// File path relative to the project root.
    pub path: PathBuf,
    /// Why it was left unclassified.
    pub reason: UnclassifiedReason,
}

/// Aggregated outcome of a full run. Write-once: constructed in one shot,
/// no mutators.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    results: Vec<RuleResult>,
    success: bool,
    unclassified: Vec<UnclassifiedFile>,
    #[serde(with = "time::serde::rfc3339")]
    generated_at: OffsetDateTime,
}

impl Report {
    /// Builds the report. Overall success is the conjunction of every
    /// rule result.
    #[must_use]
    pub fn new(results: Vec<RuleResult>, unclassified: Vec<UnclassifiedFile>) -> Self {
        let success = results.iter().all(RuleResult::success);
        Self {
            results,
            success,
            unclassified,
            generated_at: OffsetDateTime::now_utc(),
        }
    }

    /// Per-rule results, in evaluation order.
    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// Overall verdict: AND over every rule.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Files that could not be classified.
    #[must_use]
    pub fn unclassified(&self) -> &[UnclassifiedFile] {
        &self.unclassified
    }

    /// When the report was produced.
    #[must_use]
    pub fn generated_at(&self) -> OffsetDateTime {
        self.generated_at
    }

    /// Total violation count across all rules.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.results.iter().map(|r| r.violations().len()).sum()
    }

    /// Formats the full report for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            out.push_str(&result.format());
        }
        if !self.unclassified.is_empty() {
            let _ = writeln!(out, "unclassified files:");
            for file in &self.unclassified {
                match &file.reason {
                    UnclassifiedReason::NoMatchingTemplate => {
                        let _ = writeln!(out, "  {} (no matching template)", file.path.display());
                    }
                    UnclassifiedReason::ExtractionFailed { message } => {
                        let _ =
                            writeln!(out, "  {} (extraction failed: {message})", file.path.display());
                    }
                }
            }
        }
        let verdict = if self.success { "PASS" } else { "FAIL" };
        let _ = writeln!(
            out,
            "{verdict}: {} rule(s), {} violation(s), {} unclassified file(s)",
            self.results.len(),
            self.violation_count(),
            self.unclassified.len(),
        );
        out
    }
}

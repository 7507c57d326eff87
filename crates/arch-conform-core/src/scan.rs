//! Source tree scanning and parallel import extraction.
//!
//! Scanning walks the project root, extraction runs over file batches on a
//! bounded worker pool. Each worker only produces local file descriptors;
//! results are merged and sorted so completion order never affects output.
//! A cancellation signal is checked between batches.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::adapter::{ImportDecl, LanguageAdapter, SymbolDecl};

/// Files processed per worker-pool batch between cancellation checks.
const BATCH_SIZE: usize = 64;

/// Glob patterns excluded by default (vendored and generated trees).
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/vendor/**",
    "**/node_modules/**",
    "**/testdata/**",
    "**/.git/**",
];

/// A scanned source file with its extracted imports and symbols.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Raw import declarations.
    pub imports: Vec<ImportDecl>,
    /// Declared top-level symbols.
    pub symbols: Vec<SymbolDecl>,
}

/// A file whose imports could not be extracted.
///
/// The file is excluded from graph edges but kept in diagnostics; the scan
/// continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Adapter or IO error message.
    pub message: String,
}

/// Result of a completed scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Extracted files, sorted by path.
    pub files: Vec<SourceFile>,
    /// Files that failed extraction, sorted by path.
    pub warnings: Vec<ExtractionWarning>,
}

/// Cooperative cancellation signal for long scans.
///
/// Cancellation yields a distinct terminal status; callers must never
/// read a cancelled run as "no violations found".
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Scan options: include/exclude globs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// When non-empty, a file must match at least one include pattern.
    pub include: Vec<String>,
    /// Files matching any exclude pattern are skipped.
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Errors terminating a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The project root cannot be read. Fatal.
    #[error("project root `{path}` is not readable: {source}")]
    UnreadableRoot {
        /// The root that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// An include/exclude glob has invalid syntax. Fatal.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    BadGlob {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },

    /// The caller aborted the scan. Distinct from pass and fail.
    #[error("scan cancelled before completion")]
    Cancelled,
}

/// Compiled include/exclude filter.
struct PathFilter {
    include: Vec<(glob::Pattern, String)>,
    exclude: Vec<(glob::Pattern, String)>,
}

impl PathFilter {
    fn compile(options: &ScanOptions) -> Result<Self, ScanError> {
        let compile = |patterns: &[String]| -> Result<Vec<(glob::Pattern, String)>, ScanError> {
            patterns
                .iter()
                .map(|p| {
                    glob::Pattern::new(p)
                        .map(|g| (g, p.clone()))
                        .map_err(|source| ScanError::BadGlob {
                            pattern: p.clone(),
                            source,
                        })
                })
                .collect()
        };
        Ok(Self {
            include: compile(&options.include)?,
            exclude: compile(&options.exclude)?,
        })
    }

    fn admits(&self, rel: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|(g, _)| g.matches(rel)) {
            return false;
        }
        !self.exclude.iter().any(|(g, raw)| {
            if g.matches(rel) {
                return true;
            }
            // Substring fallback for `**/dir/**` style patterns
            let trimmed = raw.replace("**", "");
            let trimmed = trimmed.trim_matches('/');
            !trimmed.is_empty() && rel.split('/').any(|seg| seg == trimmed)
        })
    }
}

/// Walks the tree and extracts every file the adapters recognize.
///
/// # Errors
///
/// Returns [`ScanError::UnreadableRoot`] or [`ScanError::BadGlob`] for
/// setup faults, [`ScanError::Cancelled`] when the token fires. Per-file
/// extraction failures are collected as warnings, never errors.
pub fn scan(
    root: &Path,
    adapters: &[Box<dyn LanguageAdapter>],
    options: &ScanOptions,
    cancel: &CancelToken,
) -> Result<ScanOutcome, ScanError> {
    std::fs::read_dir(root).map_err(|source| ScanError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;

    if cancel.is_cancelled() {
        return Err(ScanError::Cancelled);
    }

    let filter = PathFilter::compile(options)?;
    let mut candidates = discover(root, adapters, &filter);
    candidates.sort_by(|a, b| a.1.cmp(&b.1));

    tracing::info!(files = candidates.len(), root = %root.display(), "scanning");

    let mut outcome = ScanOutcome::default();
    for batch in candidates.chunks(BATCH_SIZE) {
        if cancel.is_cancelled() {
            tracing::info!("scan cancelled");
            return Err(ScanError::Cancelled);
        }
        let extracted: Vec<Result<SourceFile, ExtractionWarning>> = batch
            .par_iter()
            .map(|(abs, rel, adapter_idx)| extract_one(abs, rel, &*adapters[*adapter_idx]))
            .collect();
        for item in extracted {
            match item {
                Ok(file) => outcome.files.push(file),
                Err(warning) => outcome.warnings.push(warning),
            }
        }
    }

    outcome.files.sort_by(|a, b| a.path.cmp(&b.path));
    outcome.warnings.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(outcome)
}

type Candidate = (PathBuf, PathBuf, usize);

fn discover(root: &Path, adapters: &[Box<dyn LanguageAdapter>], filter: &PathFilter) -> Vec<Candidate> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut candidates = Vec::new();
    for entry in builder.build() {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let Some(adapter_idx) = adapters
            .iter()
            .position(|a| a.extensions().contains(&ext.as_str()))
        else {
            continue;
        };

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let rel_str = rel.to_string_lossy();
        if !filter.admits(&rel_str) {
            tracing::debug!(file = %rel.display(), "excluded");
            continue;
        }

        candidates.push((path.to_path_buf(), rel, adapter_idx));
    }
    candidates
}

fn extract_one(
    abs: &Path,
    rel: &Path,
    adapter: &dyn LanguageAdapter,
) -> Result<SourceFile, ExtractionWarning> {
    let source = std::fs::read_to_string(abs).map_err(|e| ExtractionWarning {
        path: rel.to_path_buf(),
        message: format!("unreadable: {e}"),
    })?;
    match adapter.extract(&source) {
        Ok(extract) => Ok(SourceFile {
            path: rel.to_path_buf(),
            imports: extract.imports,
            symbols: extract.symbols,
        }),
        Err(e) => Err(ExtractionWarning {
            path: rel.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

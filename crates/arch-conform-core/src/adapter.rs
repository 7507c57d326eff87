//! Language-agnostic extraction types and trait.
//!
//! [`LanguageAdapter`] is the extension point for adding new languages.
//! Implement it to teach the engine how to extract import declarations and
//! top-level symbols from a language's source text. Extraction is expected
//! to be line/token-based: adapters are scanners, not compilers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a top-level symbol declaration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// An interface/trait-like declaration.
    Interface,
    /// A concrete type declaration.
    Struct,
    /// A free function.
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface => write!(f, "interface"),
            Self::Struct => write!(f, "struct"),
            Self::Function => write!(f, "function"),
        }
    }
}

/// A single import declaration extracted from source.
///
/// Aliases are resolved away by the adapter: only the target path is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Line number (1-indexed).
    pub line: usize,
    /// Raw import target path as written in source (alias discarded).
    pub path: String,
}

/// A top-level symbol declaration extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDecl {
    /// Line number (1-indexed).
    pub line: usize,
    /// Declared identifier.
    pub name: String,
    /// Kind of the declaration.
    pub kind: SymbolKind,
}

/// Result of extracting a single source file.
#[derive(Debug, Clone, Default)]
pub struct SourceExtract {
    /// All import declarations found.
    pub imports: Vec<ImportDecl>,
    /// All top-level symbol declarations found.
    pub symbols: Vec<SymbolDecl>,
}

/// A file the adapter could not make sense of.
///
/// Extraction failures are recoverable: the file is excluded from graph
/// edges and surfaced in diagnostics, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ExtractError {
    /// Line where extraction gave up (1-indexed).
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl ExtractError {
    /// Creates a new extraction error.
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Trait for language-specific import/symbol extraction.
///
/// Implement this to add support for a new language. The adapter receives
/// raw source text and returns the language-agnostic intermediate
/// representation, or an [`ExtractError`] for input it cannot scan.
pub trait LanguageAdapter: Send + Sync {
    /// Language identifier (e.g., `"go"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this adapter handles (e.g., `&[".go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts imports and top-level symbols from source text.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the source cannot be scanned
    /// (e.g., an unterminated comment or import block).
    fn extract(&self, source: &str) -> Result<SourceExtract, ExtractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_kind_display() {
        assert_eq!(SymbolKind::Interface.to_string(), "interface");
        assert_eq!(SymbolKind::Struct.to_string(), "struct");
        assert_eq!(SymbolKind::Function.to_string(), "function");
    }

    #[test]
    fn symbol_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SymbolKind::Interface).unwrap(),
            "\"interface\""
        );
        let k: SymbolKind = serde_json::from_str("\"struct\"").unwrap();
        assert_eq!(k, SymbolKind::Struct);
    }

    #[test]
    fn extract_error_display() {
        let e = ExtractError::new(7, "unterminated import block");
        assert_eq!(e.to_string(), "line 7: unterminated import block");
    }
}

//! # arch-conform-go
//!
//! Go language adapter for the arch-conform engine.
//!
//! Extraction is line/token-based: the adapter recognizes Go's import
//! syntax (single imports, grouped blocks, aliases, blank and dot imports)
//! and top-level declarations (`type`, `func`), nothing more. It is a
//! scanner, not a compiler front end; general expression and type
//! analysis is explicitly out of scope.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod strip;

use arch_conform_core::{
    ExtractError, ImportDecl, LanguageAdapter, SourceExtract, SymbolDecl, SymbolKind,
};

/// Line/token-based extractor for Go source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoAdapter;

impl GoAdapter {
    /// Creates a new adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LanguageAdapter for GoAdapter {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn extract(&self, source: &str) -> Result<SourceExtract, ExtractError> {
        let sanitized = strip::sanitize(source)?;

        let mut extract = SourceExtract::default();
        let mut import_block: Option<usize> = None;

        for (idx, line) in sanitized.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if import_block.is_some() {
                if trimmed == ")" {
                    import_block = None;
                } else if !trimmed.is_empty() {
                    match quoted(trimmed) {
                        Some(path) => extract.imports.push(ImportDecl {
                            line: line_no,
                            path: path.to_string(),
                        }),
                        None => {
                            return Err(ExtractError::new(line_no, "malformed import spec"));
                        }
                    }
                }
                continue;
            }

            // Top-level declarations sit at column 0; an indented `type`
            // or `func` is local to a body and not a module symbol
            if let Some(rest) = line.strip_prefix("import") {
                let rest = rest.trim_start();
                if rest == "(" {
                    import_block = Some(line_no);
                } else if let Some(path) = quoted(rest) {
                    // Alias (including `_` and `.`) precedes the quoted
                    // path and is discarded
                    extract.imports.push(ImportDecl {
                        line: line_no,
                        path: path.to_string(),
                    });
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("type ") {
                let mut parts = rest.split_whitespace();
                let Some(name_token) = parts.next() else {
                    continue;
                };
                let name = identifier_prefix(name_token);
                if !is_identifier(name) {
                    continue;
                }
                let kind = match parts.next() {
                    Some(k) if k.starts_with("interface") => SymbolKind::Interface,
                    Some(k) if k.starts_with("func") => SymbolKind::Function,
                    _ => SymbolKind::Struct,
                };
                extract.symbols.push(SymbolDecl {
                    line: line_no,
                    name: name.to_string(),
                    kind,
                });
                continue;
            }

            if let Some(rest) = line.strip_prefix("func ") {
                // `func (r *Repo) Save(...)` is a method, not a top-level symbol
                if rest.starts_with('(') {
                    continue;
                }
                let name = identifier_prefix(rest);
                if is_identifier(name) {
                    extract.symbols.push(SymbolDecl {
                        line: line_no,
                        name: name.to_string(),
                        kind: SymbolKind::Function,
                    });
                }
            }
        }

        if let Some(start) = import_block {
            return Err(ExtractError::new(start, "unterminated import block"));
        }

        Ok(extract)
    }
}

/// Content of the first double-quoted string in a line, if any.
fn quoted(s: &str) -> Option<&str> {
    let start = s.find('"')?;
    let rest = &s[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Leading identifier of a token, cut at generics or a parameter list.
fn identifier_prefix(token: &str) -> &str {
    token
        .split(['[', '(', '{'])
        .next()
        .unwrap_or(token)
        .trim()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> SourceExtract {
        GoAdapter::new().extract(source).unwrap()
    }

    fn import_paths(extract: &SourceExtract) -> Vec<&str> {
        extract.imports.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn single_import() {
        let e = extract("package main\n\nimport \"fmt\"\n");
        assert_eq!(import_paths(&e), vec!["fmt"]);
        assert_eq!(e.imports[0].line, 3);
    }

    #[test]
    fn aliased_import_keeps_target_path() {
        let e = extract("package main\n\nimport f \"fmt\"\n");
        assert_eq!(import_paths(&e), vec!["fmt"]);
    }

    #[test]
    fn grouped_imports_with_aliases() {
        let e = extract(
            r#"package db

import (
	"context"
	sql "database/sql"
	_ "github.com/lib/pq"
	. "example.com/shop/internal/user/domain"
)
"#,
        );
        assert_eq!(
            import_paths(&e),
            vec![
                "context",
                "database/sql",
                "github.com/lib/pq",
                "example.com/shop/internal/user/domain",
            ]
        );
        assert_eq!(e.imports[0].line, 4);
        assert_eq!(e.imports[3].line, 7);
    }

    #[test]
    fn empty_and_comment_lines_inside_block_are_skipped() {
        let e = extract(
            "package a\n\nimport (\n\t\"fmt\"\n\n\t// stdlib only\n\t\"strings\"\n)\n",
        );
        assert_eq!(import_paths(&e), vec!["fmt", "strings"]);
    }

    #[test]
    fn commented_import_is_ignored() {
        let e = extract("package a\n\n// import \"fmt\"\n/* import \"os\" */\n");
        assert!(e.imports.is_empty());
    }

    #[test]
    fn interface_struct_and_func_decls() {
        let e = extract(
            r#"package domain

type UserRepository interface {
	Find(id string) (*User, error)
}

type User struct {
	ID string
}

type Handler func(w http.ResponseWriter)

type ID = string

func NewUser(id string) *User {
	return &User{ID: id}
}
"#,
        );
        let names: Vec<(&str, SymbolKind)> = e
            .symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("UserRepository", SymbolKind::Interface),
                ("User", SymbolKind::Struct),
                ("Handler", SymbolKind::Function),
                ("ID", SymbolKind::Struct),
                ("NewUser", SymbolKind::Function),
            ]
        );
    }

    #[test]
    fn methods_are_not_top_level_symbols() {
        let e = extract(
            "package a\n\nfunc (r *Repo) Save(u User) error {\n\treturn nil\n}\n\nfunc Free() {}\n",
        );
        let names: Vec<&str> = e.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Free"]);
    }

    #[test]
    fn generic_decls_cut_at_bracket() {
        let e = extract("package a\n\ntype Set[T comparable] struct{}\n\nfunc Map[T any](v T) T { return v }\n");
        let names: Vec<&str> = e.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Set", "Map"]);
    }

    #[test]
    fn grouped_type_block_members_are_skipped() {
        // Minimal scanner: `type ( ... )` groups are not expanded
        let e = extract("package a\n\ntype (\n\tA struct{}\n\tB struct{}\n)\n");
        assert!(e.symbols.is_empty());
    }

    #[test]
    fn indented_local_decls_are_skipped() {
        let e = extract("package a\n\nfunc F() {\n\ttype local struct{}\n}\n");
        let names: Vec<&str> = e.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["F"]);
    }

    #[test]
    fn unterminated_import_block_is_an_error() {
        let err = GoAdapter::new()
            .extract("package a\n\nimport (\n\t\"fmt\"\n")
            .unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unterminated import block"));
    }

    #[test]
    fn junk_inside_import_block_is_an_error() {
        let err = GoAdapter::new()
            .extract("package a\n\nimport (\n\tnot a spec\n)\n")
            .unwrap_err();
        assert!(err.message.contains("malformed import spec"));
    }

    #[test]
    fn import_keyword_inside_raw_string_is_ignored() {
        let e = extract("package a\n\nvar tpl = `\nimport (\n\"fake\"\n)\n`\n");
        assert!(e.imports.is_empty());
    }
}

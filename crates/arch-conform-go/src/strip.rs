//! Source sanitization for the token scan.
//!
//! Blanks out comments and raw-string contents while preserving line
//! structure, so the line scanner never trips over an `import (` that
//! lives inside a comment or a backtick string. Double-quoted string
//! contents are kept; import paths live there.

use arch_conform_core::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment { start_line: usize },
    DoubleQuoted,
    RawString { start_line: usize },
    Rune,
}

/// Replaces comments and raw-string contents with spaces, keeping
/// newlines so line numbers survive.
///
/// # Errors
///
/// Returns [`ExtractError`] for an unterminated block comment or raw
/// string, input the scanner cannot trust.
pub(crate) fn sanitize(source: &str) -> Result<String, ExtractError> {
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut line = 1usize;
    let mut chars = source.chars().peekable();
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment { start_line: line };
                }
                '"' => {
                    out.push(c);
                    escaped = false;
                    state = State::DoubleQuoted;
                }
                '`' => {
                    out.push(' ');
                    state = State::RawString { start_line: line };
                }
                '\'' => {
                    out.push(c);
                    escaped = false;
                    state = State::Rune;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment { .. } => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::DoubleQuoted => {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' || c == '\n' {
                    // Go string literals cannot span lines; recover at EOL
                    state = State::Code;
                }
            }
            State::RawString { .. } => {
                if c == '`' {
                    out.push(' ');
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Rune => {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '\'' || c == '\n' {
                    state = State::Code;
                }
            }
        }
    }

    match state {
        State::BlockComment { start_line } => Err(ExtractError::new(
            start_line,
            "unterminated block comment",
        )),
        State::RawString { start_line } => {
            Err(ExtractError::new(start_line, "unterminated raw string"))
        }
        _ => Ok(out),
    }
}

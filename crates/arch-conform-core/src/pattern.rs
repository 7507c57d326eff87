//! Namespace patterns: path-like globs with wildcard capture.
//!
//! Patterns are compiled once at construction and reused for all match
//! calls; glob syntax never leaks into comparison code.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Matches the segment verbatim.
    Literal(String),
    /// `*`: matches exactly one segment, captured.
    Wildcard,
    /// `**`: matches any number of segments (including zero).
    Globstar,
}

/// A validated namespace pattern.
///
/// Namespace ids are `/`-separated paths (`internal/user/domain`).
/// Supported syntax:
///
/// - literal segments match verbatim
/// - `*` matches exactly one segment and captures it
/// - `**` matches any number of segments
/// - a trailing `/` is prefix shorthand: `internal/user/` is equivalent
///   to `internal/user/**`
///
/// Synthetic external modules (`external:<root>`) are matched only by
/// patterns whose first segment names them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Errors in namespace pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum PatternError {
    /// Pattern is the empty string.
    #[error("namespace pattern must not be empty")]
    Empty,

    /// Pattern contains an empty segment (`internal//domain`).
    #[error("namespace pattern `{pattern}` contains an empty segment")]
    EmptySegment {
        /// The offending pattern.
        pattern: String,
    },

    /// A segment mixes `*` with literal text (`dom*in`).
    #[error("namespace pattern `{pattern}`: segment `{segment}` mixes wildcards with literals")]
    MixedWildcard {
        /// The offending pattern.
        pattern: String,
        /// The offending segment.
        segment: String,
    },
}

impl NamespacePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is empty, has an empty
    /// segment, or mixes wildcards with literal text within a segment.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }

        let (body, prefix) = match raw.strip_suffix('/') {
            Some("") => {
                return Err(PatternError::EmptySegment {
                    pattern: raw.to_string(),
                })
            }
            Some(body) => (body, true),
            None => (raw, false),
        };

        let mut segments = Vec::new();
        for seg in body.split('/') {
            match seg {
                "" => {
                    return Err(PatternError::EmptySegment {
                        pattern: raw.to_string(),
                    })
                }
                "*" => segments.push(Segment::Wildcard),
                "**" => segments.push(Segment::Globstar),
                s if s.contains('*') => {
                    return Err(PatternError::MixedWildcard {
                        pattern: raw.to_string(),
                        segment: s.to_string(),
                    })
                }
                s => segments.push(Segment::Literal(s.to_string())),
            }
        }
        if prefix {
            segments.push(Segment::Globstar);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests whether a namespace id matches this pattern.
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.captures(id).is_some()
    }

    /// Matches a namespace id, returning captured `*` segments in order.
    ///
    /// Returns `None` if the id does not match.
    #[must_use]
    pub fn captures(&self, id: &str) -> Option<Vec<String>> {
        let parts: Vec<&str> = id.split('/').collect();
        let mut caps = Vec::new();
        if match_segments(&self.segments, &parts, &mut caps) {
            Some(caps)
        } else {
            None
        }
    }

    /// Whether this pattern explicitly targets synthetic external modules.
    #[must_use]
    pub fn targets_external(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Literal(s)) if s.starts_with("external:"))
    }

    /// Number of literal segments, the specificity measure used for
    /// template precedence.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Total number of compiled segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether the pattern contains a `**` segment (including the one
    /// implied by a trailing `/`).
    #[must_use]
    pub fn has_globstar(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Globstar))
    }

    /// Number of `*` segments.
    #[must_use]
    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count()
    }

    /// Instantiates the pattern with concrete capture values, one per `*`
    /// segment, producing a concrete namespace id.
    ///
    /// The caller must supply exactly [`wildcard_count`](Self::wildcard_count)
    /// values; `**` segments are not substitutable.
    #[must_use]
    pub fn substitute(&self, captures: &[&str]) -> String {
        let mut next = captures.iter();
        let rendered: Vec<&str> = self
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Literal(s) => s.as_str(),
                Segment::Wildcard => next.next().copied().unwrap_or("*"),
                Segment::Globstar => "**",
            })
            .collect();
        rendered.join("/")
    }
}

impl fmt::Display for NamespacePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for NamespacePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for NamespacePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn match_segments(pattern: &[Segment], parts: &[&str], caps: &mut Vec<String>) -> bool {
    let Some((first, rest_pattern)) = pattern.split_first() else {
        return parts.is_empty();
    };

    match first {
        Segment::Globstar => {
            // Try consuming zero or more segments
            for i in 0..=parts.len() {
                let mark = caps.len();
                if match_segments(rest_pattern, &parts[i..], caps) {
                    return true;
                }
                caps.truncate(mark);
            }
            false
        }
        Segment::Wildcard => match parts.split_first() {
            Some((part, rest)) => {
                caps.push((*part).to_string());
                if match_segments(rest_pattern, rest, caps) {
                    true
                } else {
                    caps.pop();
                    false
                }
            }
            None => false,
        },
        Segment::Literal(lit) => match parts.split_first() {
            Some((part, rest)) if *part == lit.as_str() => match_segments(rest_pattern, rest, caps),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let p = NamespacePattern::parse("internal/user/domain").unwrap();
        assert!(p.matches("internal/user/domain"));
        assert!(!p.matches("internal/user/domain/sub"));
        assert!(!p.matches("internal/user"));
    }

    #[test]
    fn wildcard_matches_one_segment_and_captures() {
        let p = NamespacePattern::parse("internal/*/domain").unwrap();
        assert_eq!(
            p.captures("internal/user/domain"),
            Some(vec!["user".to_string()])
        );
        assert!(!p.matches("internal/user/extra/domain"));
        assert!(!p.matches("internal/domain"));
    }

    #[test]
    fn globstar_matches_any_depth() {
        let p = NamespacePattern::parse("internal/**").unwrap();
        assert!(p.matches("internal"));
        assert!(p.matches("internal/user"));
        assert!(p.matches("internal/user/domain/deep"));
        assert!(!p.matches("pkg/util"));
    }

    #[test]
    fn trailing_slash_is_prefix_shorthand() {
        let p = NamespacePattern::parse("internal/user/").unwrap();
        assert!(p.matches("internal/user"));
        assert!(p.matches("internal/user/domain"));
        assert!(!p.matches("internal/userx"));
        assert!(!p.matches("internal/order/domain"));
    }

    #[test]
    fn multiple_wildcards_capture_in_order() {
        let p = NamespacePattern::parse("*/*/domain").unwrap();
        assert_eq!(
            p.captures("internal/user/domain"),
            Some(vec!["internal".to_string(), "user".to_string()])
        );
    }

    #[test]
    fn globstar_backtracking_does_not_leak_captures() {
        let p = NamespacePattern::parse("**/*/domain").unwrap();
        // '**' consumes 'a/b', '*' captures 'user'
        assert_eq!(
            p.captures("a/b/user/domain"),
            Some(vec!["user".to_string()])
        );
    }

    #[test]
    fn empty_pattern_rejected() {
        assert_eq!(NamespacePattern::parse(""), Err(PatternError::Empty));
    }

    #[test]
    fn empty_segment_rejected() {
        assert!(matches!(
            NamespacePattern::parse("internal//domain"),
            Err(PatternError::EmptySegment { .. })
        ));
        assert!(matches!(
            NamespacePattern::parse("/"),
            Err(PatternError::EmptySegment { .. })
        ));
    }

    #[test]
    fn mixed_wildcard_segment_rejected() {
        assert!(matches!(
            NamespacePattern::parse("internal/dom*in"),
            Err(PatternError::MixedWildcard { .. })
        ));
    }

    #[test]
    fn external_targeting() {
        let p = NamespacePattern::parse("external:fmt").unwrap();
        assert!(p.targets_external());
        assert!(p.matches("external:fmt"));

        let q = NamespacePattern::parse("internal/*/domain").unwrap();
        assert!(!q.targets_external());
    }

    #[test]
    fn specificity_counts() {
        let p = NamespacePattern::parse("internal/*/domain").unwrap();
        assert_eq!(p.literal_count(), 2);
        assert_eq!(p.segment_count(), 3);
        assert_eq!(p.wildcard_count(), 1);
        assert!(!p.has_globstar());

        let q = NamespacePattern::parse("internal/user/").unwrap();
        assert!(q.has_globstar());
    }

    #[test]
    fn substitute_instantiates_wildcards() {
        let p = NamespacePattern::parse("internal/*/domain").unwrap();
        assert_eq!(p.substitute(&["user"]), "internal/user/domain");
    }

    #[test]
    fn serde_round_trip_as_raw_string() {
        let p = NamespacePattern::parse("internal/*/domain").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"internal/*/domain\"");
        let back: NamespacePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn serde_rejects_malformed_pattern() {
        let result: Result<NamespacePattern, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}

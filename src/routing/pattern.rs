//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a pattern string into literal and variable segments
//! - Match a concrete request path against the compiled segments
//!
//! # Design Decisions
//! - Matching is purely structural: segment count, then per-segment compare
//! - Variables are whole segments (`{id}`, or werkzeug-style `<id>` / `<int:id>`)
//! - Converters `string`, `int` and `path` are honored; any other converter is rejected
//! - A `path` variable swallows the rest of the path, so it must come last
//! - A single trailing slash is ignored on both sides
//! - No regex, no query string, no method awareness

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when a route pattern is syntactically invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("malformed pattern: pattern is empty")]
    Empty,

    #[error("malformed pattern {0:?}: must start with '/'")]
    MissingLeadingSlash(String),

    #[error("malformed pattern {pattern:?}: unterminated variable in segment {segment:?}")]
    UnterminatedVariable { pattern: String, segment: String },

    #[error("malformed pattern {0:?}: variable has no name")]
    EmptyVariable(String),

    #[error("malformed pattern {pattern:?}: stray delimiter in segment {segment:?}")]
    StrayDelimiter { pattern: String, segment: String },

    #[error("malformed pattern {pattern:?}: variable {name:?} used twice")]
    DuplicateVariable { pattern: String, name: String },

    #[error("malformed pattern {pattern:?}: unsupported converter {converter:?}")]
    UnsupportedConverter { pattern: String, converter: String },

    #[error("malformed pattern {pattern:?}: path variable {name:?} must be the last segment")]
    MisplacedPath { pattern: String, name: String },
}

impl PatternError {
    /// The raw pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::Empty => "",
            PatternError::MissingLeadingSlash(p) | PatternError::EmptyVariable(p) => p,
            PatternError::UnterminatedVariable { pattern, .. }
            | PatternError::StrayDelimiter { pattern, .. }
            | PatternError::DuplicateVariable { pattern, .. }
            | PatternError::UnsupportedConverter { pattern, .. }
            | PatternError::MisplacedPath { pattern, .. } => pattern,
        }
    }
}

/// A single compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches only an identical segment.
    Literal(String),
    /// Matches any single non-empty segment.
    Variable(String),
    /// Matches a single segment made of ASCII digits.
    Integer(String),
    /// Matches one or more trailing segments, the first non-empty.
    Path(String),
}

impl Segment {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Segment::Literal(expected) => expected == candidate,
            Segment::Variable(_) | Segment::Path(_) => !candidate.is_empty(),
            Segment::Integer(_) => {
                !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit())
            }
        }
    }

    /// Variable name, if this segment captures one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Variable(name) | Segment::Integer(name) | Segment::Path(name) => Some(name),
        }
    }
}

/// A compiled public-route pattern such as `/user/{id}/public`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern string.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let Some(body) = normalize(pattern) else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };

        let mut seen = HashSet::new();
        let mut segments: Vec<Segment> = Vec::new();
        for part in split_segments(body) {
            if let Some(Segment::Path(name)) = segments.last() {
                return Err(PatternError::MisplacedPath {
                    pattern: pattern.to_string(),
                    name: name.clone(),
                });
            }
            let segment = compile_segment(pattern, part)?;
            if let Some(name) = segment.name() {
                if !seen.insert(name.to_string()) {
                    return Err(PatternError::DuplicateVariable {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Returns true if `path` has the same shape as this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let Some(body) = normalize(path) else {
            return false;
        };

        let mut candidate = split_segments(body);
        let mut expected = self.segments.iter();
        loop {
            match (expected.next(), candidate.next()) {
                (None, None) => return true,
                // the rest of the path belongs to the trailing path variable
                (Some(Segment::Path(_)), Some(part)) => return !part.is_empty(),
                (Some(seg), Some(part)) if seg.matches(part) => continue,
                _ => return false,
            }
        }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strip the leading slash and a single trailing slash.
/// Returns `None` when the input is not an absolute path.
fn normalize(path: &str) -> Option<&str> {
    let body = path.strip_prefix('/')?;
    Some(body.strip_suffix('/').unwrap_or(body))
}

/// Split a normalized body into segments. The root path has none.
fn split_segments(body: &str) -> impl Iterator<Item = &str> {
    let mut parts = body.split('/');
    if body.is_empty() {
        parts.next();
    }
    parts
}

fn compile_segment(pattern: &str, part: &str) -> Result<Segment, PatternError> {
    let stray = || PatternError::StrayDelimiter {
        pattern: pattern.to_string(),
        segment: part.to_string(),
    };

    let delimited = |open: char, close: char| -> Result<Option<Segment>, PatternError> {
        let Some(inner) = part.strip_prefix(open) else {
            return Ok(None);
        };
        let Some(inner) = inner.strip_suffix(close) else {
            // `{id}x` is closed, just not at the end of the segment
            if inner.contains(close) {
                return Err(stray());
            }
            return Err(PatternError::UnterminatedVariable {
                pattern: pattern.to_string(),
                segment: part.to_string(),
            });
        };
        let (converter, name) = match (open, inner.split_once(':')) {
            ('<', Some((converter, name))) => (Some(converter), name),
            _ => (None, inner),
        };
        if name.is_empty() {
            return Err(PatternError::EmptyVariable(pattern.to_string()));
        }
        if has_delimiter(name) {
            return Err(stray());
        }
        let name = name.to_string();
        let segment = match converter {
            None | Some("string") | Some("default") => Segment::Variable(name),
            Some("int") => Segment::Integer(name),
            Some("path") => Segment::Path(name),
            Some(other) => {
                return Err(PatternError::UnsupportedConverter {
                    pattern: pattern.to_string(),
                    converter: other.to_string(),
                })
            }
        };
        Ok(Some(segment))
    };

    if let Some(segment) = delimited('{', '}')? {
        return Ok(segment);
    }
    if let Some(segment) = delimited('<', '>')? {
        return Ok(segment);
    }
    if has_delimiter(part) {
        return Err(stray());
    }
    Ok(Segment::Literal(part.to_string()))
}

fn has_delimiter(s: &str) -> bool {
    s.contains(['{', '}', '<', '>'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = RoutePattern::compile("/login").unwrap();
        assert!(pattern.matches("/login"));
        assert!(pattern.matches("/login/"));
        assert!(!pattern.matches("/login/x"));
        assert!(!pattern.matches("/logout"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn test_variable_pattern() {
        let pattern = RoutePattern::compile("/user/{id}/public").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("user".into()),
                Segment::Variable("id".into()),
                Segment::Literal("public".into()),
            ]
        );
        assert!(pattern.matches("/user/42/public"));
        assert!(pattern.matches("/user/alice/public/"));
        assert!(!pattern.matches("/user/42/private"));
        assert!(!pattern.matches("/user//public"));
        assert!(!pattern.matches("/user/42/public/extra"));
        assert!(!pattern.matches("/user/42"));
    }

    #[test]
    fn test_werkzeug_style_variables() {
        let pattern = RoutePattern::compile("/user/<user_id>/public").unwrap();
        assert!(pattern.matches("/user/7/public"));

        let pattern = RoutePattern::compile("/page/<string:slug>").unwrap();
        assert_eq!(pattern.segments()[1], Segment::Variable("slug".into()));
        assert!(pattern.matches("/page/about"));
    }

    #[test]
    fn test_int_converter_matches_digits_only() {
        let pattern = RoutePattern::compile("/post/<int:post_id>").unwrap();
        assert_eq!(pattern.segments()[1], Segment::Integer("post_id".into()));
        assert!(pattern.matches("/post/42"));
        assert!(pattern.matches("/post/42/"));
        assert!(!pattern.matches("/post/admin"));
        assert!(!pattern.matches("/post/-1"));
        assert!(!pattern.matches("/post/4a"));
        assert!(!pattern.matches("/post/"));
    }

    #[test]
    fn test_path_converter_takes_the_rest() {
        let pattern = RoutePattern::compile("/static/<path:file>").unwrap();
        assert_eq!(pattern.segments()[1], Segment::Path("file".into()));
        assert!(pattern.matches("/static/app.js"));
        assert!(pattern.matches("/static/css/a.css"));
        assert!(pattern.matches("/static/css/vendor/b.css/"));
        assert!(!pattern.matches("/static"));
        assert!(!pattern.matches("/static/"));
        assert!(!pattern.matches("/static//a.css"));
        assert!(!pattern.matches("/assets/app.js"));
    }

    #[test]
    fn test_unknown_converters_are_rejected() {
        for raw in ["/item/<uuid:id>", "/price/<float:p>", "/x/<any(a,b):v>", "/x/<:v>"] {
            assert!(
                matches!(
                    RoutePattern::compile(raw),
                    Err(PatternError::UnsupportedConverter { .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_path_variable_must_be_last() {
        assert_eq!(
            RoutePattern::compile("/files/<path:rest>/meta"),
            Err(PatternError::MisplacedPath {
                pattern: "/files/<path:rest>/meta".into(),
                name: "rest".into(),
            })
        );
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::compile("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/index"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_trailing_slash_on_pattern() {
        let pattern = RoutePattern::compile("/assets/").unwrap();
        assert!(pattern.matches("/assets"));
        assert!(pattern.matches("/assets/"));
    }

    #[test]
    fn test_relative_path_never_matches() {
        let pattern = RoutePattern::compile("/{page}").unwrap();
        assert!(pattern.matches("/about"));
        assert!(!pattern.matches("about"));
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        let pattern = RoutePattern::compile("/Health").unwrap();
        assert!(!pattern.matches("/health"));
    }

    #[test]
    fn test_malformed_patterns() {
        assert_eq!(RoutePattern::compile(""), Err(PatternError::Empty));
        assert!(matches!(
            RoutePattern::compile("login"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            RoutePattern::compile("/user/{id"),
            Err(PatternError::UnterminatedVariable { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/<id"),
            Err(PatternError::UnterminatedVariable { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/{}"),
            Err(PatternError::EmptyVariable(_))
        ));
        assert!(matches!(
            RoutePattern::compile("/user/a{b}"),
            Err(PatternError::StrayDelimiter { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/{id}x"),
            Err(PatternError::StrayDelimiter { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/<id>.json"),
            Err(PatternError::StrayDelimiter { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/{a}/{a}"),
            Err(PatternError::DuplicateVariable { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/user/{id}/<int:id>"),
            Err(PatternError::DuplicateVariable { .. })
        ));
    }

    #[test]
    fn test_error_carries_pattern() {
        let err = RoutePattern::compile("/broken/{x").unwrap_err();
        assert_eq!(err.pattern(), "/broken/{x");
        assert!(err.to_string().contains("/broken/{x"));
    }

    #[test]
    fn test_from_str_and_display() {
        let pattern: RoutePattern = "/user/{id}".parse().unwrap();
        assert_eq!(pattern.to_string(), "/user/{id}");
        assert_eq!(pattern.as_str(), "/user/{id}");
    }
}

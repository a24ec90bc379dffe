//! Property path parsing

use crate::{Error, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key (or array index when the key is numeric and the container is an array)
    Key(String),

    /// Explicit array index from bracket syntax, e.g. `items[2]`
    Index(usize),
}

impl Segment {
    /// Array index addressed by this segment, if it can address one.
    ///
    /// Dotted numeric keys only count as indices in canonical form, so `"01"` stays a key.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => {
                let canonical = !key.is_empty()
                    && key.chars().all(|c| c.is_ascii_digit())
                    && (key == "0" || !key.starts_with('0'));
                if canonical { key.parse().ok() } else { None }
            }
        }
    }

    /// Object key addressed by this segment.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A parsed property path such as `a.b[0].c`
///
/// The empty path has no segments and addresses the root value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for empty segments (`a..b`, `.a`, `a.`),
    /// unclosed or unbalanced brackets, non-numeric bracket indices and
    /// characters directly following a closing bracket.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut chars = raw.char_indices().peekable();
        let mut key = String::new();
        let mut after_bracket = false;
        let mut dot_pending = false;

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '.' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !after_bracket {
                        return Err(Error::invalid_path(
                            raw,
                            format!("empty segment at offset {pos}"),
                        ));
                    }
                    after_bracket = false;
                    dot_pending = true;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if dot_pending {
                        return Err(Error::invalid_path(
                            raw,
                            format!("empty segment before '[' at offset {pos}"),
                        ));
                    }
                    segments.push(parse_bracket(raw, &mut chars)?);
                    after_bracket = true;
                    dot_pending = false;
                }
                ']' => {
                    return Err(Error::invalid_path(
                        raw,
                        format!("unexpected ']' at offset {pos}"),
                    ));
                }
                _ => {
                    if after_bracket {
                        return Err(Error::invalid_path(
                            raw,
                            format!("expected '.' or '[' after ']' at offset {pos}"),
                        ));
                    }
                    key.push(ch);
                    dot_pending = false;
                }
            }
        }

        if !key.is_empty() {
            segments.push(Segment::Key(key));
        } else if dot_pending {
            return Err(Error::invalid_path(raw, "trailing '.'"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The root path (no segments)
    #[must_use]
    pub fn root() -> Self {
        Self {
            raw: String::new(),
            segments: Vec::new(),
        }
    }

    /// Path segments in traversal order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path as originally written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this path addresses the root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Consume a bracket segment; the opening `[` has already been read.
fn parse_bracket(raw: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Segment> {
    match chars.peek().map(|&(_, c)| c) {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some((_, c)) if c == quote => break,
                    Some((_, c)) => key.push(c),
                    None => return Err(Error::invalid_path(raw, "unterminated quoted key")),
                }
            }
            match chars.next() {
                Some((_, ']')) => Ok(Segment::Key(key)),
                _ => Err(Error::invalid_path(raw, "expected ']' after quoted key")),
            }
        }
        _ => {
            let mut digits = String::new();
            loop {
                match chars.next() {
                    Some((_, ']')) => break,
                    Some((_, c)) => digits.push(c),
                    None => return Err(Error::invalid_path(raw, "unclosed bracket")),
                }
            }
            digits
                .trim()
                .parse::<usize>()
                .map(Segment::Index)
                .map_err(|_| Error::invalid_path(raw, format!("invalid index '{digits}'")))
        }
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(path: &Path) -> Vec<String> {
        path.segments().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_dotted() {
        let path = Path::parse("a.b.c").unwrap();
        assert_eq!(keys(&path), vec!["a", "b", "c"]);
        assert_eq!(path.as_str(), "a.b.c");
    }

    #[test]
    fn test_parse_brackets() {
        let path = Path::parse("items[2].sku").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("items".to_string()),
                Segment::Index(2),
                Segment::Key("sku".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_consecutive_brackets() {
        let path = Path::parse("grid[1][0]").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[2], Segment::Index(0));
    }

    #[test]
    fn test_parse_quoted_key() {
        let path = Path::parse(r#"lookup["x.y"].z"#).unwrap();
        assert_eq!(path.segments()[1], Segment::Key("x.y".to_string()));

        let path = Path::parse("['a]b']").unwrap();
        assert_eq!(path.segments(), &[Segment::Key("a]b".to_string())]);
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path = Path::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path, Path::root());
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["a..b", ".a", "a.", "a.[0]"] {
            let result = Path::parse(raw);
            assert!(
                matches!(result, Err(Error::InvalidPath { .. })),
                "expected error for {raw}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_brackets() {
        assert!(Path::parse("a[0").is_err());
        assert!(Path::parse("a[x]").is_err());
        assert!(Path::parse("a]").is_err());
        assert!(Path::parse("a[0]b").is_err());
        assert!(Path::parse("a[\"b\"").is_err());
    }

    #[test]
    fn test_numeric_key_as_index() {
        assert_eq!(Segment::Key("1".to_string()).as_index(), Some(1));
        assert_eq!(Segment::Key("0".to_string()).as_index(), Some(0));
        assert_eq!(Segment::Key("01".to_string()).as_index(), None);
        assert_eq!(Segment::Key("x".to_string()).as_index(), None);
        assert_eq!(Segment::Index(4).as_key(), "4");
    }

    #[test]
    fn test_from_str_and_display() {
        let path: Path = "a[0].b".parse().unwrap();
        assert_eq!(path.to_string(), "a[0].b");
    }
}

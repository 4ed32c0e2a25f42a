//! Selector grammar.
//!
//! A selector is applied left to right:
//! - `name` / `.name`: object field
//! - `[n]`: array index (negative counts from the end)
//! - `[*]` or a bare `*` segment: every element of an array, or every value of an object
//! - `["name"]`: object field whose name contains `.` or brackets
//!
//! The empty selector addresses the whole document.

use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(i64),
    Wildcard,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) if is_plain_field(name) => f.write_str(name),
            Segment::Field(name) => write!(f, "[{name:?}]"),
            Segment::Index(i) => write!(f, "[{i}]"),
            Segment::Wildcard => f.write_str("[*]"),
        }
    }
}

pub(crate) fn is_plain_field(name: &str) -> bool {
    !name.is_empty() && name != "*" && !name.contains(['.', '[', ']'])
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector `{selector}`: empty segment at offset {offset}")]
    EmptySegment { selector: String, offset: usize },

    #[error("selector `{selector}`: unexpected `{found}` at offset {offset}")]
    Unexpected {
        selector: String,
        found: char,
        offset: usize,
    },

    #[error("selector `{selector}`: unterminated `[` at offset {offset}")]
    Unterminated { selector: String, offset: usize },

    #[error("selector `{selector}`: invalid index `{index}`")]
    InvalidIndex { selector: String, index: String },
}

/// A parsed selector. Displays as the text it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    segments: Vec<Segment>,
}

impl Selector {
    /// The selector addressing the whole document.
    pub fn root() -> Self {
        Self {
            source: String::new(),
            segments: Vec::new(),
        }
    }

    /// A single literal field, taken verbatim (no dot splitting).
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            segments: vec![Segment::Field(name)],
        }
    }

    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let text = source.trim();
        let segments = Parser::new(text).parse()?;
        Ok(Self {
            source: text.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn parse(mut self) -> Result<Vec<Segment>, SelectorError> {
        let mut segments = Vec::new();
        // At the start of the selector or right after a `.`.
        let mut expect_field = true;
        let mut after_dot = false;

        while let Some(&(offset, c)) = self.chars.peek() {
            match c {
                '.' => {
                    if expect_field {
                        return Err(self.empty_segment(offset));
                    }
                    self.chars.next();
                    expect_field = true;
                    after_dot = true;
                }
                '[' => {
                    if after_dot {
                        return Err(self.empty_segment(offset));
                    }
                    self.chars.next();
                    segments.push(self.bracket(offset)?);
                    expect_field = false;
                }
                ']' => return Err(self.unexpected(c, offset)),
                _ => {
                    if !expect_field {
                        return Err(self.unexpected(c, offset));
                    }
                    segments.push(self.field(offset)?);
                    expect_field = false;
                    after_dot = false;
                }
            }
        }

        if after_dot {
            return Err(self.empty_segment(self.text.len()));
        }
        Ok(segments)
    }

    /// An unquoted field. Surrounding whitespace is not part of the name.
    fn field(&mut self, start: usize) -> Result<Segment, SelectorError> {
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        match name.trim() {
            "" => Err(self.empty_segment(start)),
            "*" => Ok(Segment::Wildcard),
            trimmed => Ok(Segment::Field(trimmed.to_string())),
        }
    }

    fn bracket(&mut self, open: usize) -> Result<Segment, SelectorError> {
        if let Some(&(_, quote @ ('"' | '\''))) = self.chars.peek() {
            self.chars.next();
            let name = self.quoted(quote, open)?;
            return match self.chars.next() {
                Some((_, ']')) => Ok(Segment::Field(name)),
                Some((offset, c)) => Err(self.unexpected(c, offset)),
                None => Err(self.unterminated(open)),
            };
        }

        let mut inner = String::new();
        loop {
            match self.chars.next() {
                Some((_, ']')) => break,
                Some((_, c)) => inner.push(c),
                None => return Err(self.unterminated(open)),
            }
        }

        let inner = inner.trim();
        if inner == "*" {
            return Ok(Segment::Wildcard);
        }
        inner
            .parse::<i64>()
            .map(Segment::Index)
            .map_err(|_| SelectorError::InvalidIndex {
                selector: self.text.to_string(),
                index: inner.to_string(),
            })
    }

    fn quoted(&mut self, quote: char, open: usize) -> Result<String, SelectorError> {
        let mut name = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => name.push(c),
                    None => return Err(self.unterminated(open)),
                },
                Some((_, c)) if c == quote => return Ok(name),
                Some((_, c)) => name.push(c),
                None => return Err(self.unterminated(open)),
            }
        }
    }

    fn empty_segment(&self, offset: usize) -> SelectorError {
        SelectorError::EmptySegment {
            selector: self.text.to_string(),
            offset,
        }
    }

    fn unexpected(&self, found: char, offset: usize) -> SelectorError {
        SelectorError::Unexpected {
            selector: self.text.to_string(),
            found,
            offset,
        }
    }

    fn unterminated(&self, offset: usize) -> SelectorError {
        SelectorError::Unterminated {
            selector: self.text.to_string(),
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(s: &str) -> Vec<Segment> {
        Selector::parse(s).expect("valid selector").segments().to_vec()
    }

    #[test]
    fn parses_dotted_fields() {
        assert_eq!(
            segments("input.method"),
            vec![
                Segment::Field("input".to_string()),
                Segment::Field("method".to_string())
            ]
        );
    }

    #[test]
    fn parses_indices_and_wildcards() {
        assert_eq!(
            segments("items[0].tags[*]"),
            vec![
                Segment::Field("items".to_string()),
                Segment::Index(0),
                Segment::Field("tags".to_string()),
                Segment::Wildcard,
            ]
        );
        assert_eq!(
            segments("items.*.name"),
            vec![
                Segment::Field("items".to_string()),
                Segment::Wildcard,
                Segment::Field("name".to_string()),
            ]
        );
        assert_eq!(segments("[-1]"), vec![Segment::Index(-1)]);
        assert_eq!(segments("matrix[1][2]"), vec![
            Segment::Field("matrix".to_string()),
            Segment::Index(1),
            Segment::Index(2),
        ]);
    }

    #[test]
    fn parses_quoted_fields() {
        assert_eq!(
            segments(r#"metadata.labels["app.kubernetes.io/name"]"#),
            vec![
                Segment::Field("metadata".to_string()),
                Segment::Field("labels".to_string()),
                Segment::Field("app.kubernetes.io/name".to_string()),
            ]
        );
        assert_eq!(
            segments(r"['it\'s']"),
            vec![Segment::Field("it's".to_string())]
        );
    }

    #[test]
    fn empty_selector_is_root() {
        let sel = Selector::parse("  ").expect("empty is valid");
        assert!(sel.is_root());
        assert_eq!(sel.as_str(), "");
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert!(matches!(
            Selector::parse(".a"),
            Err(SelectorError::EmptySegment { offset: 0, .. })
        ));
        assert!(matches!(
            Selector::parse("a..b"),
            Err(SelectorError::EmptySegment { offset: 2, .. })
        ));
        assert!(matches!(
            Selector::parse("a."),
            Err(SelectorError::EmptySegment { offset: 2, .. })
        ));
        assert!(matches!(
            Selector::parse("a.[0]"),
            Err(SelectorError::EmptySegment { .. })
        ));
        assert!(matches!(
            Selector::parse("a[0"),
            Err(SelectorError::Unterminated { offset: 1, .. })
        ));
        assert!(matches!(
            Selector::parse("a[x]"),
            Err(SelectorError::InvalidIndex { .. })
        ));
        assert!(matches!(
            Selector::parse("a[0]b"),
            Err(SelectorError::Unexpected { found: 'b', .. })
        ));
        assert!(matches!(
            Selector::parse("a]"),
            Err(SelectorError::Unexpected { found: ']', .. })
        ));
    }

    #[test]
    fn whitespace_around_fields_is_ignored() {
        assert_eq!(
            segments("a. b"),
            vec![Segment::Field("a".to_string()), Segment::Field("b".to_string())]
        );
        assert_eq!(
            segments("spec . containers [*]"),
            vec![
                Segment::Field("spec".to_string()),
                Segment::Field("containers".to_string()),
                Segment::Wildcard,
            ]
        );
        assert_eq!(segments("a. * .b")[1], Segment::Wildcard);
        assert_eq!(
            segments("first name"),
            vec![Segment::Field("first name".to_string())]
        );
        assert!(matches!(
            Selector::parse("a.  .b"),
            Err(SelectorError::EmptySegment { offset: 2, .. })
        ));
    }

    #[test]
    fn literal_field_keeps_dots() {
        let sel = Selector::field("app.kubernetes.io");
        assert_eq!(
            sel.segments(),
            &[Segment::Field("app.kubernetes.io".to_string())]
        );
        assert_eq!(sel.to_string(), "app.kubernetes.io");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// `start`/`end` are byte offsets into the source text (end exclusive).
/// Line values are 1-based; a line of 0 means "unknown" (synthesized nodes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    #[serde(rename = "line")]
    pub start_line: u32,
    pub end_line: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: u32, end: u32, start_line: u32, end_line: u32) -> Self {
        Self {
            start,
            end,
            start_line,
            end_line,
        }
    }

    /// A span that only knows its line, for trees assembled without source text.
    pub fn line(line: u32) -> Self {
        Self::new(0, 0, line, line)
    }

    /// Byte length of the covered text.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.start_line)
    }
}

/// Holds the source text a tree was parsed from.
///
/// The analyzer uses it to recover initializer text verbatim.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source: String = source.into();
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// The text covered by `span`, or `None` if the span is empty, out of
    /// range, or does not fall on character boundaries.
    pub fn slice(&self, span: Span) -> Option<&str> {
        if span.is_empty() {
            return None;
        }
        self.source.get(span.start as usize..span.end as usize)
    }

    /// 1-based line number containing the byte offset.
    pub fn line_of(&self, offset: usize) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        idx as u32 + 1
    }

    /// Build a span for `start..end`, computing its lines.
    ///
    /// `None` when either offset does not fit the `u32` offsets of [`Span`].
    pub fn span(&self, start: usize, end: usize) -> Option<Span> {
        Some(Span::new(
            u32::try_from(start).ok()?,
            u32::try_from(end).ok()?,
            self.line_of(start),
            self.line_of(end.saturating_sub(1).max(start)),
        ))
    }
}

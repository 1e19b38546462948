//! Document identities and immutable text snapshots.

use std::fmt;
use std::sync::Arc;

use crate::{LineIndex, Locality, Position, Range, Span};

/// Identity of a document: the program being analysed or a copybook.
///
/// Cheap to clone; compared by string value.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentUri(Arc<str>);

impl DocumentUri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        DocumentUri(uri.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentUri {
    fn from(uri: &str) -> Self {
        DocumentUri(Arc::from(uri))
    }
}

impl From<String> for DocumentUri {
    fn from(uri: String) -> Self {
        DocumentUri(Arc::from(uri))
    }
}

impl fmt::Debug for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable snapshot of a document's text with its line table.
///
/// Clones share the text and the line table.
#[derive(Clone)]
pub struct SourceText {
    uri: DocumentUri,
    text: Arc<str>,
    lines: Arc<LineIndex>,
}

impl SourceText {
    pub fn new(uri: impl Into<DocumentUri>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let lines = Arc::new(LineIndex::new(&text));
        SourceText {
            uri: uri.into(),
            text,
            lines,
        }
    }

    #[inline]
    pub fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        u32::try_from(self.text.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Span covering the whole document.
    #[inline]
    pub fn full_span(&self) -> Span {
        Span::new(0, self.len())
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Text under `span`, or `None` when the span is out of bounds or splits
    /// a character.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.to_range())
    }

    /// Whether `span` lies inside the text and on character boundaries.
    pub fn is_valid_span(&self, span: Span) -> bool {
        span.start <= span.end
            && span.end <= self.len()
            && self.text.is_char_boundary(span.start as usize)
            && self.text.is_char_boundary(span.end as usize)
    }

    #[inline]
    pub fn position(&self, offset: u32) -> Position {
        self.lines.position(&self.text, offset)
    }

    /// Locality of `span` within this document.
    pub fn locality(&self, span: Span) -> Locality {
        let range = Range::new(self.position(span.start), self.position(span.end));
        Locality::new(self.uri.clone(), span, range)
    }

    /// Locality of the single character starting at `offset`.
    ///
    /// At or past the end of the text this is a zero-length locality.
    pub fn char_locality(&self, offset: u32) -> Locality {
        let width = self
            .text
            .get(offset as usize..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let width = u32::try_from(width).unwrap_or(0);
        self.locality(Span::new(offset, offset + width))
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("uri", &self.uri)
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.text == other.text
    }
}

impl Eq for SourceText {}

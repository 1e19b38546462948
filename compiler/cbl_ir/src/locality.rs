//! Document-tagged text ranges.

use std::fmt;

use crate::{DocumentUri, Position, Range, Span};

/// A range of text tagged with the document it belongs to.
///
/// Every position the engine reports (diagnostics, copy statements,
/// definitions, usages, mapped offsets) is a `Locality` in the coordinates
/// of the document that actually contains the text, never in the
/// coordinates of the expanded buffer.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locality {
    pub uri: DocumentUri,
    /// Byte offsets within the document.
    pub span: Span,
    /// Line/column form of `span`.
    pub range: Range,
}

impl Locality {
    pub fn new(uri: DocumentUri, span: Span, range: Range) -> Self {
        debug_assert!(span.start <= span.end);
        debug_assert!(range.start <= range.end);
        Locality { uri, span, range }
    }

    #[inline]
    pub fn start(&self) -> Position {
        self.range.start
    }

    #[inline]
    pub fn end(&self) -> Position {
        self.range.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Ordering key used wherever localities must sort deterministically:
    /// document, then offset.
    pub fn sort_key(&self) -> (&DocumentUri, u32, u32) {
        (&self.uri, self.span.start, self.span.end)
    }

    /// Smallest locality covering both. `None` across documents.
    pub fn merge(&self, other: &Locality) -> Option<Locality> {
        if self.uri != other.uri {
            return None;
        }
        let (start, start_pos) = if self.span.start <= other.span.start {
            (self.span.start, self.range.start)
        } else {
            (other.span.start, other.range.start)
        };
        let (end, end_pos) = if self.span.end >= other.span.end {
            (self.span.end, self.range.end)
        } else {
            (other.span.end, other.range.end)
        };
        Some(Locality::new(
            self.uri.clone(),
            Span::new(start, end),
            Range::new(start_pos, end_pos),
        ))
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uri, self.range.start)
    }
}

/// Reverse mapping from offsets in an expanded buffer to source localities.
pub trait LocalityMapper {
    /// Locality of the character that produced `offset`, or `None` when
    /// `offset` is past the end of the expanded text.
    fn map_offset(&self, offset: u32) -> Option<Locality>;

    /// Length of the expanded text in bytes.
    fn extended_len(&self) -> u32;

    /// Locality of an expanded-text range.
    ///
    /// Both ends are mapped; when they land in the same document the result
    /// covers both, otherwise the start's locality is returned. An empty
    /// span at the very end maps to the end of the last character.
    fn map_span(&self, span: Span) -> Option<Locality> {
        if span.is_empty() {
            if let Some(start) = self.map_offset(span.start) {
                let point = Span::point(start.span.start);
                return Some(Locality::new(
                    start.uri,
                    point,
                    Range::new(start.range.start, start.range.start),
                ));
            }
            let last = self.map_offset(span.start.checked_sub(1)?)?;
            return Some(Locality::new(
                last.uri,
                Span::point(last.span.end),
                Range::new(last.range.end, last.range.end),
            ));
        }
        let start = self.map_offset(span.start)?;
        let Some(end) = self.map_offset(span.end - 1) else {
            return Some(start);
        };
        Some(start.merge(&end).unwrap_or(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceText;
    use pretty_assertions::assert_eq;

    #[test]
    fn equality_requires_same_document() {
        let a = SourceText::new("a", "same text");
        let b = SourceText::new("b", "same text");
        assert_ne!(a.locality(Span::new(0, 4)), b.locality(Span::new(0, 4)));
        assert_eq!(a.locality(Span::new(0, 4)), a.locality(Span::new(0, 4)));
    }

    #[test]
    fn merge_within_document() {
        let source = SourceText::new("a", "one\ntwo\nthree");
        let merged = source
            .locality(Span::new(4, 7))
            .merge(&source.locality(Span::new(0, 3)));
        assert_eq!(merged, Some(source.locality(Span::new(0, 7))));
    }

    #[test]
    fn merge_across_documents_is_none() {
        let a = SourceText::new("a", "x");
        let b = SourceText::new("b", "x");
        assert_eq!(a.locality(Span::new(0, 1)).merge(&b.locality(Span::new(0, 1))), None);
    }

    #[test]
    fn display_shows_uri_and_start() {
        let source = SourceText::new("file:///p.cbl", "ab\ncd");
        assert_eq!(source.locality(Span::new(4, 5)).to_string(), "file:///p.cbl:2:1");
    }

    /// Identity mapper over a single document.
    struct Identity(SourceText);

    impl LocalityMapper for Identity {
        fn map_offset(&self, offset: u32) -> Option<Locality> {
            (offset < self.0.len()).then(|| self.0.char_locality(offset))
        }

        fn extended_len(&self) -> u32 {
            self.0.len()
        }
    }

    #[test]
    fn map_span_defaults() {
        let mapper = Identity(SourceText::new("a", "abc\ndef"));
        assert_eq!(
            mapper.map_span(Span::new(1, 5)),
            Some(mapper.0.locality(Span::new(1, 5)))
        );
        assert_eq!(
            mapper.map_span(Span::point(7)),
            Some(mapper.0.locality(Span::point(7)))
        );
        assert_eq!(mapper.map_span(Span::point(0)), Some(mapper.0.locality(Span::point(0))));
        assert_eq!(mapper.map_span(Span::new(9, 10)), None);
    }
}

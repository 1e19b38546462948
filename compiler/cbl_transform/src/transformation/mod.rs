//! Text Transformation
//!
//! Builds the expanded text of a program by splicing copybook documents in
//! place of copy statements, and maps every offset of the result back to
//! the document that produced it.
//!
//! # Design
//!
//! A transformation is a persistent span tree. Each document is an ordered
//! list of segments:
//!
//! - `Original`: an untouched span of the document's own text
//! - `Replaced`: substitute text standing for a span of the document
//! - `Extended`: a nested transformation standing for a span of the document
//!
//! Edits are addressed in the coordinates of the document they target
//! (its URI and its own byte offsets), never in expanded-text offsets. An
//! edit only ever splits the one `Original` segment that contains it, so
//! earlier edits never shift the addresses of later ones, and splicing into
//! a nested document leaves its siblings addressable.

use std::sync::Arc;

use cbl_ir::{DocumentUri, Locality, LocalityMapper, SourceText, Span};
use tracing::trace;

use crate::mapping::LocalityMap;
use crate::{InvalidReason, TransformError};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Original(Span),
    Replaced { text: Arc<str>, origin: Span },
    Extended(Box<TextTransformation>),
}

impl Segment {
    #[inline]
    fn len(&self) -> u32 {
        match self {
            Segment::Original(span) => span.len(),
            Segment::Replaced { text, .. } => u32::try_from(text.len()).unwrap_or(u32::MAX),
            Segment::Extended(document) => document.len,
        }
    }
}

/// Expanded view of one document and everything spliced into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTransformation {
    source: SourceText,
    segments: Vec<Segment>,
    /// Cached length of the expanded text.
    len: u32,
}

impl TextTransformation {
    /// An unmodified view of `source`.
    pub fn new(source: SourceText) -> Self {
        let full = source.full_span();
        TextTransformation {
            source,
            segments: vec![Segment::Original(full)],
            len: full.len(),
        }
    }

    #[inline]
    pub fn source(&self) -> &SourceText {
        &self.source
    }

    #[inline]
    pub fn uri(&self) -> &DocumentUri {
        self.source.uri()
    }

    /// Splice `document` in place of `at`.
    ///
    /// `at` names the target document by URI and addresses it in that
    /// document's own offsets. A zero-width `at` inserts.
    ///
    /// # Errors
    ///
    /// `InvalidLocality` when no document in the tree has `at.uri`, the span
    /// is out of bounds, or it overlaps text consumed by an earlier edit.
    pub fn extend(
        &mut self,
        at: &Locality,
        document: TextTransformation,
    ) -> Result<(), TransformError> {
        self.apply(at, Segment::Extended(Box::new(document)))
    }

    /// Substitute `text` for `at`.
    ///
    /// # Errors
    ///
    /// Same as [`extend`](Self::extend).
    pub fn replace(
        &mut self,
        at: &Locality,
        text: impl Into<Arc<str>>,
    ) -> Result<(), TransformError> {
        self.apply(
            at,
            Segment::Replaced {
                text: text.into(),
                origin: at.span,
            },
        )
    }

    /// The fully expanded text. Pure: repeated calls give the same result.
    pub fn calculate_extended_text(&self) -> String {
        let mut out = String::with_capacity(self.len as usize);
        self.write_to(&mut out);
        out
    }

    /// Length of the expanded text in bytes.
    #[inline]
    pub fn extended_len(&self) -> u32 {
        self.len
    }

    /// Origin of the character at `offset` of the expanded text.
    ///
    /// Offsets inside replacement text map to the replaced span. Offsets at
    /// or past the end map to `None`.
    pub fn map_offset(&self, offset: u32) -> Option<Locality> {
        let mut remaining = offset;
        for segment in &self.segments {
            let len = segment.len();
            if remaining < len {
                return match segment {
                    Segment::Original(span) => {
                        Some(char_locality_at(&self.source, span.start + remaining))
                    }
                    Segment::Replaced { origin, .. } => Some(self.source.locality(*origin)),
                    Segment::Extended(document) => document.map_offset(remaining),
                };
            }
            remaining -= len;
        }
        None
    }

    /// Flattened, binary-searchable snapshot of the mapping.
    pub fn locality_map(&self) -> LocalityMap {
        let mut map = LocalityMap::default();
        self.collect_runs(&mut map);
        map
    }

    fn write_to(&self, out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Original(span) => out.push_str(self.source.slice(*span).unwrap_or_default()),
                Segment::Replaced { text, .. } => out.push_str(text),
                Segment::Extended(document) => document.write_to(out),
            }
        }
    }

    fn collect_runs(&self, map: &mut LocalityMap) {
        for segment in &self.segments {
            match segment {
                Segment::Original(span) => map.push_text(&self.source, *span),
                Segment::Replaced { text, origin } => {
                    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
                    map.push_replaced(self.source.locality(*origin), len);
                }
                Segment::Extended(document) => document.collect_runs(map),
            }
        }
    }

    fn apply(&mut self, at: &Locality, segment: Segment) -> Result<(), TransformError> {
        let mut path = Vec::new();
        let mut reason = InvalidReason::UnknownDocument;
        let Some(index) = self.find_owner(at, &mut path, &mut reason) else {
            return Err(TransformError::InvalidLocality {
                locality: at.clone(),
                reason,
            });
        };
        self.splice_along(&path, index, at.span, segment);
        Ok(())
    }

    /// Pre-order search for the first document named `at.uri` with a live
    /// segment covering `at.span`.
    ///
    /// On success `path` holds the indices of the `Extended` segments leading
    /// to the owner, and the owner's segment index is returned.
    fn find_owner(
        &self,
        at: &Locality,
        path: &mut Vec<usize>,
        reason: &mut InvalidReason,
    ) -> Option<usize> {
        if self.uri() == &at.uri {
            if !self.source.is_valid_span(at.span) {
                *reason = InvalidReason::OutOfBounds;
            } else if let Some(index) = self.live_segment(at.span) {
                return Some(index);
            } else {
                *reason = InvalidReason::AlreadyConsumed;
            }
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if let Segment::Extended(document) = segment {
                path.push(i);
                if let Some(index) = document.find_owner(at, path, reason) {
                    return Some(index);
                }
                path.pop();
            }
        }
        None
    }

    fn live_segment(&self, span: Span) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| matches!(segment, Segment::Original(live) if live.contains_span(span)))
    }

    fn splice_along(&mut self, path: &[usize], index: usize, span: Span, segment: Segment) {
        match path.split_first() {
            None => self.splice(index, span, segment),
            Some((&head, rest)) => {
                if let Some(Segment::Extended(document)) = self.segments.get_mut(head) {
                    document.splice_along(rest, index, span, segment);
                }
            }
        }
        self.len = self.segments.iter().map(Segment::len).sum();
    }

    fn splice(&mut self, index: usize, span: Span, segment: Segment) {
        let Some(&Segment::Original(live)) = self.segments.get(index) else {
            return;
        };
        trace!(uri = %self.uri(), %live, %span, "splitting segment");
        // Empty leftovers stay so zero-width edits at the boundary remain addressable.
        let pieces = [
            Segment::Original(Span::new(live.start, span.start)),
            segment,
            Segment::Original(Span::new(span.end, live.end)),
        ];
        self.segments.splice(index..=index, pieces);
    }
}

impl LocalityMapper for TextTransformation {
    fn map_offset(&self, offset: u32) -> Option<Locality> {
        TextTransformation::map_offset(self, offset)
    }

    fn extended_len(&self) -> u32 {
        self.len
    }
}

/// Locality of the character containing byte `offset`.
pub(crate) fn char_locality_at(source: &SourceText, offset: u32) -> Locality {
    let mut start = offset;
    while start > 0 && !source.text().is_char_boundary(start as usize) {
        start -= 1;
    }
    source.char_locality(start)
}

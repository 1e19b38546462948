//! Flattened locality map.
//!
//! [`TextTransformation::map_offset`](crate::TextTransformation::map_offset)
//! walks the span tree on every query. Editor features ask for many offsets
//! per analysis, so the tree is flattened once into sorted runs and queried
//! with a binary search.

use cbl_ir::{Locality, LocalityMapper, SourceText, Span};

use crate::transformation::char_locality_at;

#[derive(Clone, Debug)]
enum Origin {
    /// Characters copied from `source`, starting at byte `start`.
    Text { source: SourceText, start: u32 },
    /// Replacement text; every character maps to the replaced span.
    Replaced(Locality),
}

#[derive(Clone, Debug)]
struct Run {
    /// Offset in the expanded text.
    start: u32,
    len: u32,
    origin: Origin,
}

impl Run {
    #[inline]
    fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// Sorted, non-overlapping runs covering the whole expanded text.
#[derive(Clone, Debug, Default)]
pub struct LocalityMap {
    runs: Vec<Run>,
    len: u32,
}

impl LocalityMap {
    pub(crate) fn push_text(&mut self, source: &SourceText, span: Span) {
        if span.is_empty() {
            return;
        }
        if let Some(Run {
            len,
            origin: Origin::Text { source: last, start },
            ..
        }) = self.runs.last_mut()
        {
            if last.uri() == source.uri() && *start + *len == span.start {
                *len += span.len();
                self.len += span.len();
                return;
            }
        }
        self.push(
            span.len(),
            Origin::Text {
                source: source.clone(),
                start: span.start,
            },
        );
    }

    pub(crate) fn push_replaced(&mut self, locality: Locality, len: u32) {
        if len > 0 {
            self.push(len, Origin::Replaced(locality));
        }
    }

    fn push(&mut self, len: u32, origin: Origin) {
        self.runs.push(Run {
            start: self.len,
            len,
            origin,
        });
        self.len += len;
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl LocalityMapper for LocalityMap {
    fn map_offset(&self, offset: u32) -> Option<Locality> {
        let index = self.runs.partition_point(|run| run.end() <= offset);
        let run = self.runs.get(index)?;
        if offset < run.start {
            return None;
        }
        match &run.origin {
            Origin::Text { source, start } => {
                Some(char_locality_at(source, start + (offset - run.start)))
            }
            Origin::Replaced(locality) => Some(locality.clone()),
        }
    }

    fn extended_len(&self) -> u32 {
        self.len
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TextTransformation;
    use pretty_assertions::assert_eq;

    fn transformation() -> TextTransformation {
        let program = SourceText::new("prog", "AAA COPY X. BBB");
        let book = SourceText::new("book", "xyz");
        let mut root = TextTransformation::new(program.clone());
        root.extend(&program.locality(Span::new(4, 11)), TextTransformation::new(book))
            .unwrap();
        root.replace(&program.locality(Span::new(12, 15)), "C")
            .unwrap();
        root
    }

    #[test]
    fn agrees_with_tree_walk() {
        let root = transformation();
        let map = root.locality_map();
        assert_eq!(map.len(), root.extended_len());
        for offset in 0..=root.extended_len() + 1 {
            assert_eq!(map.map_offset(offset), root.map_offset(offset), "offset {offset}");
        }
    }

    #[test]
    fn runs_switch_documents_at_splice_boundaries() {
        let map = transformation().locality_map();
        let origin = |offset: u32| {
            let locality = map.map_offset(offset).unwrap();
            (locality.uri.to_string(), locality.span)
        };
        assert_eq!(origin(3), ("prog".to_string(), Span::new(3, 4)));
        assert_eq!(origin(4), ("book".to_string(), Span::new(0, 1)));
        assert_eq!(origin(6), ("book".to_string(), Span::new(2, 3)));
        assert_eq!(origin(7), ("prog".to_string(), Span::new(11, 12)));
        assert_eq!(origin(8), ("prog".to_string(), Span::new(12, 15)));
    }

    #[test]
    fn adjacent_runs_of_one_document_merge() {
        let program = SourceText::new("prog", "abcdef");
        let mut root = TextTransformation::new(program.clone());
        // An empty insertion splits the segment without changing the text.
        root.extend(
            &program.locality(Span::point(3)),
            TextTransformation::new(SourceText::new("empty", "")),
        )
        .unwrap();
        assert_eq!(root.locality_map().runs.len(), 1);
    }

    #[test]
    fn empty_map() {
        let map = LocalityMap::default();
        assert!(map.is_empty());
        assert_eq!(map.map_offset(0), None);
    }
}

//! Merging diagnostics from every stage into one list.
//!
//! Diagnostics arrive from the copybook parsers, the resolver and the text
//! transformation in whatever order the recursive resolution produced them.
//! The aggregator:
//! - drops exact duplicates (the same cycle found from two top-level
//!   occurrences reports the same locality twice)
//! - orders the result by document, then offset, keeping arrival order for
//!   ties, so test comparisons are deterministic

use std::collections::BTreeMap;

use cbl_ir::DocumentUri;
use rustc_hash::FxHashSet;

use crate::SyntaxError;

#[derive(Clone, Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<SyntaxError>,
    seen: FxHashSet<SyntaxError>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic. Returns `false` if an identical one was already added.
    pub fn add(&mut self, error: SyntaxError) -> bool {
        if !self.seen.insert(error.clone()) {
            return false;
        }
        self.errors.push(error);
        true
    }

    /// Diagnostics ordered by document, then offset.
    pub fn finish(self) -> Vec<SyntaxError> {
        let mut errors = self.errors;
        let already_sorted = errors
            .windows(2)
            .all(|w| w[0].locality.sort_key() <= w[1].locality.sort_key());
        if !already_sorted {
            errors.sort_by(|a, b| a.locality.sort_key().cmp(&b.locality.sort_key()));
        }
        errors
    }
}

impl Extend<SyntaxError> for ErrorAggregator {
    fn extend<T: IntoIterator<Item = SyntaxError>>(&mut self, iter: T) {
        for error in iter {
            self.add(error);
        }
    }
}

/// Group diagnostics by the document they point into, keeping their order.
pub fn by_document(errors: &[SyntaxError]) -> BTreeMap<DocumentUri, Vec<&SyntaxError>> {
    let mut grouped: BTreeMap<DocumentUri, Vec<&SyntaxError>> = BTreeMap::new();
    for error in errors {
        grouped
            .entry(error.locality.uri.clone())
            .or_default()
            .push(error);
    }
    grouped
}

#[cfg(test)]
mod tests;

//! Property-based tests for text transformations.
//!
//! Random documents are spliced into each other at random character
//! boundaries (including into documents that are already nested) and the
//! result is checked for:
//! 1. Left inverse: every character of the expanded text maps back to the
//!    same character of the document that produced it
//! 2. Idempotence: the expanded text is the same on every call
//! 3. The flattened map agrees with the tree walk

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::cast_possible_truncation,
    reason = "Proptest macros generate code with these patterns"
)]

use std::iter;

use cbl_ir::{LocalityMapper, SourceText, Span};
use cbl_transform::TextTransformation;
use proptest::prelude::*;
use proptest::sample::Index;

fn root_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z .\n]{0,40}").expect("valid regex")
}

fn insert_strategy() -> impl Strategy<Value = (String, Index, Index)> {
    (
        prop::string::string_regex("[a-z\u{e9}\u{3b1} \n]{0,12}").expect("valid regex"),
        any::<Index>(),
        any::<Index>(),
    )
}

fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
        .collect()
}

/// Splice every insert into a randomly chosen document of the tree.
fn build(root: &str, inserts: &[(String, Index, Index)]) -> (TextTransformation, Vec<SourceText>) {
    let mut documents = vec![SourceText::new("doc0", root)];
    let mut transformation = TextTransformation::new(documents[0].clone());
    for (i, (text, document, point)) in inserts.iter().enumerate() {
        let target = documents[document.index(documents.len())].clone();
        let candidates = boundaries(target.text());
        let at = candidates[point.index(candidates.len())] as u32;
        let inserted = SourceText::new(format!("doc{}", i + 1), text.as_str());
        transformation
            .extend(
                &target.locality(Span::point(at)),
                TextTransformation::new(inserted.clone()),
            )
            .unwrap();
        documents.push(inserted);
    }
    (transformation, documents)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn map_offset_is_left_inverse(
        root in root_strategy(),
        inserts in prop::collection::vec(insert_strategy(), 0..6),
    ) {
        let (transformation, documents) = build(&root, &inserts);
        let text = transformation.calculate_extended_text();
        prop_assert_eq!(text.len() as u32, transformation.extended_len());

        for (offset, ch) in text.char_indices() {
            let locality = transformation.map_offset(offset as u32).unwrap();
            let document = documents.iter().find(|d| d.uri() == &locality.uri).unwrap();
            let mut buf = [0u8; 4];
            prop_assert_eq!(document.slice(locality.span), Some(&*ch.encode_utf8(&mut buf)));
        }
        prop_assert_eq!(transformation.map_offset(text.len() as u32), None);
    }

    #[test]
    fn extended_text_is_idempotent(
        root in root_strategy(),
        inserts in prop::collection::vec(insert_strategy(), 0..6),
    ) {
        let (transformation, _) = build(&root, &inserts);
        let first = transformation.calculate_extended_text();
        prop_assert_eq!(transformation.calculate_extended_text(), first);
    }

    #[test]
    fn flattened_map_agrees_with_tree(
        root in root_strategy(),
        inserts in prop::collection::vec(insert_strategy(), 0..6),
    ) {
        let (transformation, _) = build(&root, &inserts);
        let map = transformation.locality_map();
        prop_assert_eq!(map.len(), transformation.extended_len());
        for offset in 0..=transformation.extended_len() {
            prop_assert_eq!(map.map_offset(offset), transformation.map_offset(offset));
        }
    }
}

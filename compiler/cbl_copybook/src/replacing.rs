//! `COPY ... REPLACING` applied to an expanded copybook.
//!
//! The copybook's own text is split into text words. An operand matches a
//! run of whole text words, case-insensitively outside literals, with any
//! separators in between. Tag operands (`:TAG:`, `(TAG)`) match inside
//! words instead. Matches are taken left to right without overlaps and
//! substituted with [`TextTransformation::replace`], so unreplaced
//! characters keep their exact origin and replacement text maps to the span
//! it replaced. A match that touches a nested copy statement (already
//! consumed by its expansion) or text an earlier pair replaced is skipped.

use std::ops::Range;

use cbl_ir::Span;
use cbl_transform::TextTransformation;
use tracing::trace;

use crate::dialect::lexer::is_comment_line;
use crate::dialect::Replacement;

/// Apply `replacements` in order. Returns how many substitutions were made.
pub fn apply_replacements(expansion: &mut TextTransformation, replacements: &[Replacement]) -> usize {
    let source = expansion.source().clone();
    let text = source.text();
    let words = text_words(text);
    let mut applied = 0;

    for replacement in replacements {
        let matches = if replacement.partial {
            tag_matches(text, &replacement.from)
        } else {
            word_matches(text, &words, &replacement.from)
        };
        for range in matches {
            let Ok(span) = Span::try_from_range(range) else {
                continue;
            };
            match expansion.replace(&source.locality(span), replacement.to.as_str()) {
                Ok(()) => applied += 1,
                Err(err) => trace!(%err, "replacement skipped"),
            }
        }
    }
    applied
}

/// Runs of `words` equal to the words of `operand`, as byte ranges of
/// `text` from the first word's start to the last word's end.
fn word_matches(text: &str, words: &[Range<usize>], operand: &str) -> Vec<Range<usize>> {
    let mut pattern = Vec::new();
    words_in_line(operand, 0, &mut pattern);
    let pattern: Vec<&str> = pattern.into_iter().filter_map(|word| operand.get(word)).collect();
    if pattern.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut i = 0;
    while i + pattern.len() <= words.len() {
        let run = &words[i..i + pattern.len()];
        let equal = run
            .iter()
            .zip(&pattern)
            .all(|(word, expected)| text.get(word.clone()).is_some_and(|word| same_word(word, expected)));
        if equal {
            found.push(run[0].start..run[run.len() - 1].end);
            i += pattern.len();
        } else {
            i += 1;
        }
    }
    found
}

/// Case-insensitive occurrences of `tag` anywhere in `text`.
fn tag_matches(text: &str, tag: &str) -> Vec<Range<usize>> {
    // ASCII upper-casing keeps byte offsets identical to `text`.
    let upper = text.to_ascii_uppercase();
    let tag = tag.to_ascii_uppercase();
    upper
        .match_indices(tag.as_str())
        .map(|(start, _)| start..start + tag.len())
        .collect()
}

fn same_word(word: &str, expected: &str) -> bool {
    if is_literal(word) || is_literal(expected) {
        word == expected
    } else {
        word.eq_ignore_ascii_case(expected)
    }
}

fn is_literal(word: &str) -> bool {
    word.starts_with(['\'', '"'])
}

/// Text words of every non-comment line of `text`.
fn text_words(text: &str) -> Vec<Range<usize>> {
    let mut words = Vec::new();
    let mut line_start = 0;
    for line in text.split_inclusive('\n') {
        if !is_comment_line(line) {
            words_in_line(line, line_start, &mut words);
        }
        line_start += line.len();
    }
    words
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b',' | b';')
}

/// Split `line` into text words. Literals are single words, parentheses
/// are words of their own, and a period ending a word is split off.
fn words_in_line(line: &str, offset: usize, words: &mut Vec<Range<usize>>) {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if is_separator(byte) {
            i += 1;
            continue;
        }
        let start = i;
        match byte {
            b'\'' | b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != byte && bytes[i] != b'\n' {
                    i += 1;
                }
                if bytes.get(i) == Some(&byte) {
                    i += 1;
                }
            }
            b'(' | b')' => i += 1,
            _ => {
                while i < bytes.len()
                    && !is_separator(bytes[i])
                    && !matches!(bytes[i], b'(' | b')' | b'\'' | b'"')
                {
                    i += 1;
                }
                if i - start > 1 && bytes[i - 1] == b'.' {
                    i -= 1;
                }
            }
        }
        words.push(offset + start..offset + i);
    }
}

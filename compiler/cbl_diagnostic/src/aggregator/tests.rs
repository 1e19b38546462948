use pretty_assertions::assert_eq;

use cbl_ir::{SourceText, Span};

use super::*;
use crate::{ErrorCode, ErrorSource};

fn error(source: &SourceText, span: Span, code: ErrorCode) -> SyntaxError {
    SyntaxError::new(code, ErrorSource::Copybook, source.locality(span), code.as_str())
}

#[test]
fn duplicates_are_dropped() {
    let book = SourceText::new("B", "COPY A.");
    let mut aggregator = ErrorAggregator::new();

    assert!(aggregator.add(error(&book, Span::new(0, 7), ErrorCode::E2002)));
    assert!(!aggregator.add(error(&book, Span::new(0, 7), ErrorCode::E2002)));
    assert!(aggregator.add(error(&book, Span::new(0, 7), ErrorCode::E2001)));

    let codes: Vec<ErrorCode> = aggregator.finish().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2002, ErrorCode::E2001]);
}

#[test]
fn finish_orders_by_document_then_offset() {
    let a = SourceText::new("a", "0123456789");
    let b = SourceText::new("b", "0123456789");
    let mut aggregator = ErrorAggregator::new();
    aggregator.add(error(&b, Span::new(1, 2), ErrorCode::E2001));
    aggregator.add(error(&a, Span::new(5, 6), ErrorCode::E2001));
    aggregator.add(error(&a, Span::new(0, 1), ErrorCode::E0001));

    let ordered: Vec<(String, u32)> = aggregator
        .finish()
        .into_iter()
        .map(|e| (e.locality.uri.to_string(), e.locality.span.start))
        .collect();

    assert_eq!(
        ordered,
        vec![("a".to_string(), 0), ("a".to_string(), 5), ("b".to_string(), 1)]
    );
}

#[test]
fn finish_is_stable_for_equal_positions() {
    let a = SourceText::new("a", "COPY X.");
    let mut aggregator = ErrorAggregator::new();
    aggregator.add(error(&a, Span::new(0, 7), ErrorCode::E2001));
    aggregator.add(error(&a, Span::new(0, 7), ErrorCode::E0001));

    let codes: Vec<ErrorCode> = aggregator.finish().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E0001]);
}

#[test]
fn by_document_groups_in_order() {
    let a = SourceText::new("a", "0123");
    let b = SourceText::new("b", "0123");
    let errors = vec![
        error(&a, Span::new(0, 1), ErrorCode::E2001),
        error(&b, Span::new(0, 1), ErrorCode::E2001),
        error(&a, Span::new(2, 3), ErrorCode::E2002),
    ];
    let grouped = by_document(&errors);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[&DocumentUri::from("a")].len(), 2);
    assert_eq!(grouped[&DocumentUri::from("b")].len(), 1);
}

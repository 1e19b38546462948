use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_point() {
    let point = Span::point(42);
    assert!(point.is_empty());
    assert_eq!(point.len(), 0);
    assert!(!point.contains(42));
}

#[test]
fn test_span_contains_span_boundaries() {
    let span = Span::new(10, 20);
    assert!(span.contains_span(Span::new(10, 20)));
    assert!(span.contains_span(Span::point(10)));
    assert!(span.contains_span(Span::point(20)));
    assert!(!span.contains_span(Span::new(9, 12)));
    assert!(!span.contains_span(Span::new(15, 21)));
}

#[test]
fn test_span_overlaps() {
    let span = Span::new(10, 20);
    assert!(span.overlaps(Span::new(19, 25)));
    assert!(!span.overlaps(Span::new(20, 25)));
    assert!(!span.overlaps(Span::point(15)));
}

#[test]
fn test_span_merge_disjoint() {
    let merged = Span::new(20, 30).merge(Span::new(0, 10));
    assert_eq!(merged, Span::new(0, 30));
}

#[test]
fn test_span_try_from_range() {
    assert_eq!(Span::try_from_range(50..100), Ok(Span::new(50, 100)));

    let large = u32::MAX as usize + 1;
    assert!(matches!(
        Span::try_from_range(large..large + 10),
        Err(SpanError::StartTooLarge(_))
    ));
    assert!(matches!(
        Span::try_from_range(0..large),
        Err(SpanError::EndTooLarge(_))
    ));
    assert!(matches!(
        Span::try_from_range(5..1),
        Err(SpanError::Inverted { start: 5, end: 1 })
    ));
}

#[test]
fn test_span_error_display() {
    let msg = SpanError::StartTooLarge(0x1_0000_0000).to_string();
    assert!(msg.contains("start"));
    assert!(msg.contains("4294967296"));
}

#[test]
fn test_span_debug_display() {
    let span = Span::new(100, 200);
    assert_eq!(format!("{span:?}"), "100..200");
    assert_eq!(format!("{span}"), "100..200");
}

#[test]
fn test_span_ordering() {
    let mut spans = vec![Span::new(5, 9), Span::new(0, 3), Span::new(5, 6)];
    spans.sort();
    assert_eq!(spans, vec![Span::new(0, 3), Span::new(5, 6), Span::new(5, 9)]);
}

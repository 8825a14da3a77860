use super::*;

#[test]
fn span_merge_covers_both() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));

    let reversed = Span::new(15, 30).merge(Span::new(10, 20));
    assert_eq!(reversed, Span::new(10, 30));
}

#[test]
fn span_point_is_zero_width() {
    assert_eq!(Span::point(7), Span::new(7, 7));
}

#[test]
fn span_try_from_range() {
    let Ok(span) = Span::try_from_range(50..100) else {
        panic!("expected Ok for valid range");
    };
    assert_eq!(span, Span::new(50, 100));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn span_try_from_range_too_large() {
    let big = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(big..big),
        Err(SpanError::StartTooLarge(big))
    );
    assert_eq!(Span::try_from_range(0..big), Err(SpanError::EndTooLarge(big)));
}

#[test]
fn span_debug_format() {
    assert_eq!(format!("{:?}", Span::new(3, 9)), "3..9");
}

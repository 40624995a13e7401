use super::*;

#[test]
fn test_line_map_mixed_line_endings() {
    let source = "a\nbb\r\nccc\rd";
    let map = LineMap::build(source);

    assert_eq!(map.line_count(), 4);
    assert_eq!(map.offset_to_position(2, source), Position::new(1, 0));
    assert_eq!(map.offset_to_position(6, source), Position::new(2, 0));
    assert_eq!(map.offset_to_position(10, source), Position::new(3, 0));
}

#[test]
fn test_position_to_offset_roundtrip() {
    let source = "const x = 1;\nlet y = 2;\nvar z = 3;";
    let map = LineMap::build(source);

    for offset in 0..source.len() as u32 {
        let pos = map.offset_to_position(offset, source);
        let back = map.position_to_offset(pos, source);
        assert_eq!(back, Some(offset), "roundtrip failed for offset {offset}");
    }
}

#[test]
fn test_utf16_columns() {
    let source = "A \u{1F680} B";
    let map = LineMap::build(source);

    // The rocket takes 4 bytes but 2 UTF-16 units.
    assert_eq!(map.offset_to_position(7, source).character, 5);
    assert_eq!(map.position_to_offset(Position::new(0, 5), source), Some(7));
}

#[test]
fn test_position_past_line_end_clamps() {
    let source = "ab\ncd";
    let map = LineMap::build(source);

    assert_eq!(map.position_to_offset(Position::new(0, 99), source), Some(2));
    assert_eq!(map.position_to_offset(Position::new(5, 0), source), None);
}

#[test]
fn test_line_text_strips_terminator() {
    let source = "first\r\nsecond\nthird";
    let map = LineMap::build(source);

    assert_eq!(map.line_text(1, source), "first");
    assert_eq!(map.line_text(9, source), "second");
    assert_eq!(map.line_text(source.len() as u32, source), "third");
}

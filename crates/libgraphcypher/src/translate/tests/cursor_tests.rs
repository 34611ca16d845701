use crate::translate::cursor_to_offset;
use crate::translate::offset_to_cursor;

#[test]
fn cursors_encode_the_array_offset() {
    assert_eq!(offset_to_cursor(0), "YXJyYXljb25uZWN0aW9uOjA=");
    assert_eq!(cursor_to_offset("YXJyYXljb25uZWN0aW9uOjA="), Some(0));
    assert_eq!(cursor_to_offset(&offset_to_cursor(41)), Some(41));
}

#[test]
fn foreign_cursors_are_rejected() {
    assert_eq!(cursor_to_offset("not base64!"), None);
    // base64("cursor:3")
    assert_eq!(cursor_to_offset("Y3Vyc29yOjM="), None);
}

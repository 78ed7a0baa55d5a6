use super::{wrap_lines, DocumentSurface, GutterSurface, VisualLine, MAX_ZOOM};
use crate::view_sync::{Selection, TextSurface, ViewSynchronizer};

#[test]
fn test_wrapping_splits_long_lines() {
    let visual = wrap_lines("abcdefg\n\nxy", 3);
    assert_eq!(
        visual,
        vec![
            VisualLine { logical: 0, start: 0, len: 3, continuation: false },
            VisualLine { logical: 0, start: 3, len: 3, continuation: true },
            VisualLine { logical: 0, start: 6, len: 1, continuation: true },
            VisualLine { logical: 1, start: 8, len: 0, continuation: false },
            VisualLine { logical: 2, start: 9, len: 2, continuation: false },
        ]
    );
}

#[test]
fn test_zero_width_does_not_loop() {
    let visual = wrap_lines("ab", 0);
    assert_eq!(visual.len(), 2);
}

#[test]
fn test_gutter_labels_first_row_of_each_line() {
    let visual = wrap_lines("abcdefg\nxy", 3);
    let mut gutter = GutterSurface::new(&visual, 1);
    gutter.set_height(10);
    assert_eq!(gutter.visible(), ["1", "", "", "2"]);
    assert_eq!(gutter.width(), 2);
}

#[test]
fn test_caret_scrolls_into_view() {
    let text = (1..=20).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
    let mut doc = DocumentSurface::new(&text, 80, 1);
    doc.resize(80, 5);

    let offset = doc.first_char_of_visual_line(12);
    doc.select(offset, 0);
    doc.scroll_to_caret();
    assert_eq!(doc.visual_line_at_top(), 8);

    doc.select(0, 0);
    doc.scroll_to_caret();
    assert_eq!(doc.visual_line_at_top(), 0);
}

#[test]
fn test_selection_is_clamped() {
    let mut doc = DocumentSurface::new("abc", 80, 1);
    doc.select(10, 5);
    assert_eq!(doc.selection(), Selection { start: 3, length: 0 });
    doc.select(1, 10);
    assert_eq!(doc.selected_text(), "bc");
}

#[test]
fn test_scroll_is_clamped_to_last_page() {
    let text = "a\nb\nc\nd\ne";
    let mut doc = DocumentSurface::new(text, 80, 1);
    doc.resize(80, 2);
    doc.scroll_by(100);
    assert_eq!(doc.visual_line_at_top(), 3);
    doc.scroll_by(-100);
    assert_eq!(doc.visual_line_at_top(), 0);
}

#[test]
fn test_zoom_is_bounded_and_shrinks_page() {
    let text = "a\nb\nc\nd\ne\nf";
    let mut doc = DocumentSurface::new(text, 80, 1);
    doc.resize(80, 4);
    assert_eq!(doc.visible().len(), 4);
    doc.zoom_by(1);
    assert_eq!(doc.visible().len(), 2);
    doc.zoom_by(50);
    assert_eq!(doc.zoom(), MAX_ZOOM);
    doc.zoom_by(-50);
    assert_eq!(doc.zoom(), 1);
}

#[test]
fn test_caret_line_movement_keeps_column() {
    let mut doc = DocumentSurface::new("hello\nhi\nworld", 80, 1);
    doc.resize(80, 10);
    doc.select(4, 0);
    doc.move_caret_lines(1);
    assert_eq!(doc.selection().start, 8, "Column clamps to the shorter line");
    doc.move_caret_lines(1);
    assert_eq!(doc.selection().start, 11);
}

#[test]
fn test_scrolled_document_drives_gutter() {
    let text = "one long line here\nshort\nanother long line";
    let mut doc = DocumentSurface::new(text, 6, 1);
    doc.resize(6, 2);
    let mut gutter = GutterSurface::new(doc.visual_lines(), 1);
    gutter.set_height(2);
    let mut sync = ViewSynchronizer::new();

    doc.scroll_by(3);
    assert!(sync.on_scroll(&doc, &mut gutter));
    assert_eq!(gutter.visual_line_at_top(), doc.visual_line_at_top());

    let row = doc.visible()[0];
    let label = &gutter.visible()[0];
    assert!(!row.continuation);
    assert_eq!(label, &(row.logical + 1).to_string());
}

#[test]
fn test_reload_keeps_gutter_position() {
    let visual = wrap_lines("a\nb\nc\nd", 80);
    let mut gutter = GutterSurface::new(&visual, 1);
    let start = gutter.first_char_of_visual_line(2);
    gutter.select(start, 0);
    gutter.scroll_to_caret();
    assert_eq!(gutter.visual_line_at_top(), 2);

    gutter.rebuild(&wrap_lines("a\nb\nc\nd\ne", 80));
    assert_eq!(gutter.visual_line_at_top(), 2);
}

#[test]
fn test_cell_to_offset_respects_scroll_and_zoom() {
    let mut doc = DocumentSurface::new("ab\ncdef\ng\nh", 80, 2);
    doc.resize(80, 4);
    assert_eq!(doc.offset_at_cell(0, 1), 1);
    assert_eq!(doc.offset_at_cell(1, 1), 1, "Padding row belongs to the line above");
    assert_eq!(doc.offset_at_cell(2, 9), 7, "Column clamps to the row end");

    doc.scroll_by(1);
    assert_eq!(doc.offset_at_cell(0, 0), 3);
    assert_eq!(doc.offset_at_cell(40, 0), 10, "Rows past the end clamp to the last line");
}

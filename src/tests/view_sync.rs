use super::{ClickState, Highlighter, Selection, TextSurface, ViewSynchronizer};
use crate::search::SearchMatch;

#[derive(Default)]
struct FakeSurface {
    top: usize,
    selection: Selection,
    zoom: u16,
    scrolls: usize,
    highlights: Vec<SearchMatch>,
}

impl TextSurface for FakeSurface {
    fn visual_line_at_top(&self) -> usize {
        self.top
    }

    fn first_char_of_visual_line(&self, line: usize) -> usize {
        line * 10
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn select(&mut self, start: usize, length: usize) {
        self.selection = Selection { start, length };
    }

    fn scroll_to_caret(&mut self) {
        self.scrolls += 1;
    }

    fn zoom(&self) -> u16 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u16) {
        self.zoom = zoom;
    }
}

impl Highlighter for FakeSurface {
    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn highlight(&mut self, span: SearchMatch) {
        self.highlights.push(span);
    }
}

#[test]
fn test_scroll_sync_repositions_gutter() {
    let mut sync = ViewSynchronizer::new();
    let primary = FakeSurface { top: 3, ..FakeSurface::default() };
    let mut gutter = FakeSurface::default();

    assert!(sync.on_scroll(&primary, &mut gutter));
    assert_eq!(gutter.selection, Selection { start: 30, length: 0 });
    assert_eq!(gutter.scrolls, 1);
    assert_eq!(sync.last_visual_line, 3);
}

#[test]
fn test_scroll_sync_is_idempotent() {
    let mut sync = ViewSynchronizer::new();
    let primary = FakeSurface { top: 5, ..FakeSurface::default() };
    let mut gutter = FakeSurface::default();

    assert!(sync.on_scroll(&primary, &mut gutter));
    assert!(!sync.on_scroll(&primary, &mut gutter));
    assert_eq!(gutter.scrolls, 1, "Same visual line must not scroll the gutter twice");
}

#[test]
fn test_scroll_sync_starts_at_line_zero() {
    let mut sync = ViewSynchronizer::new();
    let primary = FakeSurface::default();
    let mut gutter = FakeSurface::default();
    assert!(!sync.on_scroll(&primary, &mut gutter));
    assert_eq!(gutter.scrolls, 0);
}

#[test]
fn test_scroll_sync_never_drives_primary() {
    let mut sync = ViewSynchronizer::new();
    let primary = FakeSurface { top: 2, ..FakeSurface::default() };
    let mut gutter = FakeSurface { top: 9, ..FakeSurface::default() };
    sync.on_scroll(&primary, &mut gutter);
    assert_eq!(primary.scrolls, 0);
    assert_eq!(primary.selection, Selection::default());
}

#[test]
fn test_zoom_sync_copies_factor() {
    let sync = ViewSynchronizer::new();
    let primary = FakeSurface { zoom: 3, ..FakeSurface::default() };
    let mut gutter = FakeSurface { zoom: 1, ..FakeSurface::default() };
    sync.on_zoom(&primary, &mut gutter);
    assert_eq!(gutter.zoom, 3);
}

#[test]
fn test_double_click_suppresses_fold_toggles() {
    let mut sync = ViewSynchronizer::new();
    let mut primary = FakeSurface::default();
    let text = "##1 Alpha\nbody";

    for _ in 0..3 {
        sync.on_pointer_down(2);
        assert_eq!(sync.click_state, ClickState::ArmedByDoubleClick);
        assert!(!sync.allow_fold_toggle(), "Collapse while armed must be cancelled");
        assert!(!sync.allow_fold_toggle(), "Expand while armed must be cancelled");
        sync.activate("Alpha", text, &mut primary);
        assert_eq!(sync.click_state, ClickState::Idle);
    }
}

#[test]
fn test_single_click_allows_fold_toggle() {
    let mut sync = ViewSynchronizer::new();
    sync.on_pointer_down(2);
    sync.on_pointer_down(1);
    assert!(sync.allow_fold_toggle());
}

#[test]
fn test_activation_moves_caret_to_title() {
    let mut sync = ViewSynchronizer::new();
    let mut primary = FakeSurface::default();
    let text = "intro\n##1 Second\nbody";

    let offset = sync.activate("Second\r\n", text, &mut primary);
    assert_eq!(offset, Some(10));
    assert_eq!(primary.selection, Selection { start: 10, length: 0 });
    assert_eq!(primary.scrolls, 1);
    assert_eq!(sync.last_navigation, Some(10));
}

#[test]
fn test_activation_miss_is_silent() {
    let mut sync = ViewSynchronizer::new();
    let mut primary = FakeSurface {
        selection: Selection { start: 4, length: 2 },
        ..FakeSurface::default()
    };

    assert_eq!(sync.activate("Gone", "nothing here", &mut primary), None);
    assert_eq!(primary.selection, Selection { start: 4, length: 2 });
    assert_eq!(primary.scrolls, 0);
    assert_eq!(sync.last_navigation, None);
}

#[test]
fn test_restore_caret_after_reload() {
    let mut sync = ViewSynchronizer::new();
    let mut primary = FakeSurface::default();
    sync.activate("b", "a b", &mut primary);

    let mut reloaded = FakeSurface::default();
    sync.restore_caret(&mut reloaded);
    assert_eq!(reloaded.selection, Selection { start: 2, length: 0 });
}

#[test]
fn test_search_replaces_highlights_and_restores_caret() {
    let sync = ViewSynchronizer::new();
    let mut primary = FakeSurface {
        selection: Selection { start: 7, length: 0 },
        highlights: vec![SearchMatch { start: 0, length: 99 }],
        ..FakeSurface::default()
    };

    let matches = sync.apply_search("to do, to go", "to", &mut primary);
    assert_eq!(matches.len(), 2);
    assert_eq!(primary.highlights, matches, "Old highlights must be cleared first");
    assert_eq!(
        primary.selection,
        Selection { start: 7, length: 0 },
        "A bare caret must not grow a selection"
    );
}

#[test]
fn test_search_keeps_selection_length() {
    let sync = ViewSynchronizer::new();
    let mut primary = FakeSurface {
        selection: Selection { start: 3, length: 5 },
        ..FakeSurface::default()
    };

    sync.apply_search("to do, to go", "to", &mut primary);
    assert_eq!(primary.selection, Selection { start: 3, length: 5 });
}

#[test]
fn test_blank_search_only_clears() {
    let sync = ViewSynchronizer::new();
    let mut primary = FakeSurface {
        selection: Selection { start: 3, length: 1 },
        highlights: vec![SearchMatch { start: 0, length: 1 }],
        ..FakeSurface::default()
    };

    assert!(sync.apply_search("abc", "  ", &mut primary).is_empty());
    assert!(primary.highlights.is_empty());
    assert_eq!(primary.selection, Selection { start: 3, length: 1 });
}

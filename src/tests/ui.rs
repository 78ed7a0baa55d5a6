use super::{draw, is_highlighted, zoomed};
use crate::app_state::{AppState, Settings};
use crate::outline::MarkerMatch;
use crate::search::SearchMatch;
use crate::store::FileStore;
use ratatui::{backend::TestBackend, text::Line, Terminal};
use std::fs;
use tempfile::TempDir;

fn render(app: &mut AppState, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .chunks(usize::from(width))
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect())
        .collect()
}

#[test]
fn test_highlight_lookup_handles_overlaps() {
    let matches = [
        SearchMatch { start: 0, length: 2 },
        SearchMatch { start: 1, length: 2 },
        SearchMatch { start: 7, length: 2 },
    ];
    assert!(is_highlighted(&matches, 0));
    assert!(is_highlighted(&matches, 2));
    assert!(!is_highlighted(&matches, 3));
    assert!(is_highlighted(&matches, 8));
    assert!(!is_highlighted(&matches, 9));
    assert!(!is_highlighted(&[], 0));
}

#[test]
fn test_zoom_pads_rows() {
    let rows = zoomed(vec![Line::from("a"), Line::from("b")], 3);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[3], Line::from("b"));
}

#[test]
fn test_draw_shows_outline_gutter_and_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "##1 Alpha\nbody\n##2 Beta\nmore").unwrap();
    let settings = Settings {
        marker_match: MarkerMatch::Exact,
        wrap_width: 100,
        zoom: 1,
    };
    let mut app = AppState::new(Box::new(FileStore::new(&path)), &settings);

    let screen = render(&mut app, 80, 12);

    assert!(screen.iter().any(|row| row.contains("▾ Alpha")));
    assert!(screen.iter().any(|row| row.contains("Beta")));
    assert!(screen.iter().any(|row| row.contains("1 ##1 Alpha")));
    assert!(screen.iter().any(|row| row.contains("4 more")));
    assert!(app.document_area.width > 0, "Layout must be recorded for mouse input");
}

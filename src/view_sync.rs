//! Keeps the gutter aligned with the document view and maps outline nodes back to text.
//!
//! The synchronizer owns the only mutable state shared between events: the last visual line it
//! synchronized and whether the tree is inside a double-click gesture. The views themselves are
//! reached through the [`TextSurface`] and [`Highlighter`] traits so the logic here does not
//! depend on how text is drawn.

use crate::search::{self, SearchMatch};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Caret start and selection length, in characters.
pub struct Selection {
    /// Character offset of the caret.
    pub start: usize,
    /// Number of selected characters after the caret.
    pub length: usize,
}

/// Queries and commands a text view offers to the synchronizer.
///
/// Out-of-range inputs are clamped by the implementation, never rejected.
pub trait TextSurface {
    /// Visual (wrapped) line currently at the top of the viewport.
    fn visual_line_at_top(&self) -> usize;
    /// Character offset of the first character on a visual line.
    fn first_char_of_visual_line(&self, line: usize) -> usize;
    /// Current caret and selection.
    fn selection(&self) -> Selection;
    /// Move the caret to `start` and select `length` characters.
    fn select(&mut self, start: usize, length: usize);
    /// Scroll so the caret is visible.
    fn scroll_to_caret(&mut self);
    /// Current zoom factor.
    fn zoom(&self) -> u16;
    /// Set the zoom factor.
    fn set_zoom(&mut self, zoom: u16);
}

/// A view able to paint search highlights over its text.
pub trait Highlighter {
    /// Remove every highlight.
    fn clear_highlights(&mut self);
    /// Highlight one span.
    fn highlight(&mut self, span: SearchMatch);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Whether the outline tree is inside a double-click gesture.
///
/// ```text
/// Idle --pointer down, clicks > 1--> ArmedByDoubleClick
///   ^                                   |
///   |____ node activated / single click |
/// ```
///
/// While armed, fold toggles are suppressed so that double-clicking a node to navigate does
/// not also collapse or expand it.
enum ClickState {
    /// Fold toggles pass through.
    #[default]
    Idle,
    /// A double click is in progress; fold toggles are cancelled.
    ArmedByDoubleClick,
}

#[derive(Debug, Default)]
/// Owner of the cross-event view state.
pub struct ViewSynchronizer {
    last_visual_line: usize,
    click_state: ClickState,
    last_navigation: Option<usize>,
}

impl ViewSynchronizer {
    #[must_use]
    /// A synchronizer that considers line 0 already synchronized.
    pub fn new() -> Self {
        Self::default()
    }

    /// React to a scroll or resize of the primary view.
    ///
    /// Returns whether the gutter was repositioned. Repeating the same visual line is a no-op.
    pub fn on_scroll<P, G>(&mut self, primary: &P, gutter: &mut G) -> bool
    where
        P: TextSurface + ?Sized,
        G: TextSurface + ?Sized,
    {
        let line = primary.visual_line_at_top();
        if line == self.last_visual_line {
            return false;
        }
        self.last_visual_line = line;
        gutter.select(gutter.first_char_of_visual_line(line), 0);
        gutter.scroll_to_caret();
        debug!(line, "gutter synchronized");
        true
    }

    /// Copy the primary view's zoom factor onto the gutter.
    pub fn on_zoom<P, G>(&self, primary: &P, gutter: &mut G)
    where
        P: TextSurface + ?Sized,
        G: TextSurface + ?Sized,
    {
        gutter.set_zoom(primary.zoom());
    }

    /// Record a pointer-down on the tree; more than one click arms suppression.
    pub fn on_pointer_down(&mut self, clicks: u8) {
        self.click_state = if clicks > 1 {
            ClickState::ArmedByDoubleClick
        } else {
            ClickState::Idle
        };
    }

    #[must_use]
    /// Whether a collapse or expand attempt may proceed.
    pub fn allow_fold_toggle(&self) -> bool {
        self.click_state == ClickState::Idle
    }

    /// Navigate the primary view to the first occurrence of a node title.
    ///
    /// Line breaks are removed from the title before searching. A miss leaves the view alone.
    /// Either way the double-click gesture ends here.
    pub fn activate<P>(&mut self, title: &str, text: &str, primary: &mut P) -> Option<usize>
    where
        P: TextSurface + ?Sized,
    {
        let needle: String = title.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        let found = search::find_first(text, &needle);
        if let Some(offset) = found {
            primary.select(offset, 0);
            primary.scroll_to_caret();
            self.last_navigation = Some(offset);
            debug!(offset, title = needle.as_str(), "navigated to outline node");
        } else {
            debug!(title = needle.as_str(), "outline node not found in text");
        }
        self.click_state = ClickState::Idle;
        found
    }

    /// Put the caret back on the last navigated offset after a reload.
    pub fn restore_caret<P>(&self, primary: &mut P)
    where
        P: TextSurface + ?Sized,
    {
        if let Some(offset) = self.last_navigation {
            primary.select(offset, 0);
            primary.scroll_to_caret();
        }
    }

    /// Replace all highlights with the matches of `query` and restore the selection.
    ///
    /// Caret and selection length are exactly what they were before the search. A blank query
    /// only clears the highlights.
    pub fn apply_search<P>(&self, text: &str, query: &str, primary: &mut P) -> Vec<SearchMatch>
    where
        P: TextSurface + Highlighter + ?Sized,
    {
        primary.clear_highlights();
        if search::is_blank(query) {
            return Vec::new();
        }

        let before = primary.selection();
        let matches = search::find_all(text, query);
        for span in &matches {
            primary.highlight(*span);
        }
        primary.select(before.start, before.length);
        debug!(query, count = matches.len(), "search applied");
        matches
    }

    /// Remove every search highlight.
    pub fn clear_search<P>(&self, primary: &mut P)
    where
        P: Highlighter + ?Sized,
    {
        primary.clear_highlights();
    }
}

#[cfg(test)]
#[path = "tests/view_sync.rs"]
mod tests;

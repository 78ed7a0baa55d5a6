//! Terminal text surfaces: the document view and its line-number gutter.
//!
//! These are the rendering-layer side of view synchronization. The document surface wraps the
//! text into visual lines at the viewport width and answers the visual-line queries the
//! synchronizer needs; the gutter carries one label per document visual line, so that equal
//! visual-line indices in both views always show the same logical line.
//!
//! Zoom is a row-height factor: every visual line takes `zoom` terminal rows in both views.

use crate::line::{self, Line, TextPosition};
use crate::search::SearchMatch;
use crate::view_sync::{Highlighter, Selection, TextSurface};

/// Smallest zoom factor.
pub const MIN_ZOOM: u16 = 1;
/// Largest zoom factor.
pub const MAX_ZOOM: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A rendered row of the document, possibly a wrapped piece of a longer logical line.
pub struct VisualLine {
    /// Logical line this row belongs to.
    pub logical: usize,
    /// Character offset of the row's first character.
    pub start: usize,
    /// Number of characters on the row.
    pub len: usize,
    /// Whether the row continues a logical line started on an earlier row.
    pub continuation: bool,
}

#[must_use]
/// Hard-wrap every logical line of `text` at `width` characters.
///
/// Empty lines still produce one visual line. A zero width is treated as one.
pub fn wrap_lines(text: &str, width: usize) -> Vec<VisualLine> {
    let width = width.max(1);
    let starts = line::line_offsets(text);
    line::split_into_lines(text)
        .iter()
        .zip(starts)
        .flat_map(|(Line { index, text }, line_start)| {
            let len = text.chars().count();
            let logical = *index;
            (0..len.max(1)).step_by(width).map(move |piece| VisualLine {
                logical,
                start: line_start + piece,
                len: width.min(len - piece.min(len)),
                continuation: piece > 0,
            })
        })
        .collect()
}

fn clamp_zoom(zoom: u16) -> u16 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Number of visual lines that fit in `height` rows at `zoom`.
fn lines_per_page(height: usize, zoom: u16) -> usize {
    (height / usize::from(zoom)).max(1)
}

#[derive(Debug)]
/// The primary view: wrapped document text with caret, selection and search highlights.
pub struct DocumentSurface {
    text: String,
    char_count: usize,
    width: usize,
    height: usize,
    visual: Vec<VisualLine>,
    top: usize,
    selection: Selection,
    zoom: u16,
    highlights: Vec<SearchMatch>,
}

impl DocumentSurface {
    #[must_use]
    /// A surface showing `text` wrapped at `width`.
    pub fn new(text: &str, width: usize, zoom: u16) -> Self {
        Self {
            text: text.to_string(),
            char_count: text.chars().count(),
            width,
            height: 1,
            visual: wrap_lines(text, width),
            top: 0,
            selection: Selection::default(),
            zoom: clamp_zoom(zoom),
            highlights: Vec::new(),
        }
    }

    /// Replace the text after a reload. Highlights are dropped; caret and scroll are clamped.
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.char_count = text.chars().count();
        self.visual = wrap_lines(text, self.width);
        self.highlights.clear();
        self.select(self.selection.start, self.selection.length);
        self.top = self.top.min(self.max_top());
    }

    /// Adapt to a new viewport size, rewrapping if the width changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width {
            self.width = width;
            self.visual = wrap_lines(&self.text, width);
        }
        self.height = height.max(1);
        self.top = self.top.min(self.max_top());
    }

    #[must_use]
    /// The text currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    /// Every visual line of the document.
    pub fn visual_lines(&self) -> &[VisualLine] {
        &self.visual
    }

    #[must_use]
    /// The visual lines inside the viewport, starting at the top one.
    pub fn visible(&self) -> &[VisualLine] {
        let end = (self.top + self.page()).min(self.visual.len());
        &self.visual[self.top.min(end)..end]
    }

    #[must_use]
    /// Active search highlights.
    pub fn highlights(&self) -> &[SearchMatch] {
        &self.highlights
    }

    #[must_use]
    /// Caret as a logical row and column.
    pub fn caret_position(&self) -> TextPosition {
        line::position_of(&self.text, self.selection.start)
    }

    #[must_use]
    /// The selected characters.
    pub fn selected_text(&self) -> String {
        self.text
            .chars()
            .skip(self.selection.start)
            .take(self.selection.length)
            .collect()
    }

    #[must_use]
    /// Visual line containing character `offset`.
    pub fn visual_line_of(&self, offset: usize) -> usize {
        self.visual
            .partition_point(|v| v.start <= offset)
            .saturating_sub(1)
    }

    #[must_use]
    /// Character offset shown at a cell of the viewport, clamped to the row's end.
    ///
    /// Rows are terminal rows, so zoom padding rows map to the visual line above them.
    pub fn offset_at_cell(&self, row: usize, column: usize) -> usize {
        let line = (self.top + row / usize::from(self.zoom)).min(self.visual.len() - 1);
        let visual = self.visual[line];
        visual.start + column.min(visual.len)
    }

    /// Scroll by `delta` visual lines without moving the caret.
    pub fn scroll_by(&mut self, delta: isize) {
        self.top = self
            .top
            .saturating_add_signed(delta)
            .min(self.max_top());
    }

    /// Scroll by whole pages.
    pub fn page_by(&mut self, pages: isize) {
        let page = isize::try_from(self.page()).unwrap_or(isize::MAX);
        self.scroll_by(pages.saturating_mul(page));
    }

    /// Move the caret by `delta` characters, dropping the selection.
    pub fn move_caret(&mut self, delta: isize) {
        let start = self.selection.start.saturating_add_signed(delta);
        self.select(start, 0);
        self.scroll_to_caret();
    }

    /// Move the caret up or down by visual lines, keeping its column where possible.
    pub fn move_caret_lines(&mut self, delta: isize) {
        if self.visual.is_empty() {
            return;
        }
        let current = self.visual_line_of(self.selection.start);
        let column = self.selection.start - self.visual[current].start;
        let target = current
            .saturating_add_signed(delta)
            .min(self.visual.len() - 1);
        let row = self.visual[target];
        self.select(row.start + column.min(row.len), 0);
        self.scroll_to_caret();
    }

    /// Grow or shrink the selection by `delta` characters at its end.
    pub fn extend_selection(&mut self, delta: isize) {
        let length = self.selection.length.saturating_add_signed(delta);
        self.select(self.selection.start, length);
    }

    /// Change the zoom by `delta` steps within the allowed range.
    pub fn zoom_by(&mut self, delta: i16) {
        self.set_zoom(self.zoom.saturating_add_signed(delta));
    }

    fn page(&self) -> usize {
        lines_per_page(self.height, self.zoom)
    }

    fn max_top(&self) -> usize {
        self.visual.len().saturating_sub(self.page())
    }
}

impl TextSurface for DocumentSurface {
    fn visual_line_at_top(&self) -> usize {
        self.top
    }

    fn first_char_of_visual_line(&self, line: usize) -> usize {
        self.visual
            .get(line)
            .or_else(|| self.visual.last())
            .map_or(0, |v| v.start)
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn select(&mut self, start: usize, length: usize) {
        let start = start.min(self.char_count);
        self.selection = Selection {
            start,
            length: length.min(self.char_count - start),
        };
    }

    fn scroll_to_caret(&mut self) {
        let line = self.visual_line_of(self.selection.start);
        if line < self.top {
            self.top = line;
        } else if line >= self.top + self.page() {
            self.top = (line + 1 - self.page()).min(self.max_top());
        }
    }

    fn zoom(&self) -> u16 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u16) {
        self.zoom = clamp_zoom(zoom);
        self.top = self.top.min(self.max_top());
    }
}

impl Highlighter for DocumentSurface {
    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn highlight(&mut self, span: SearchMatch) {
        self.highlights.push(span);
    }
}

#[derive(Debug)]
/// The secondary view: one line-number label per document visual line.
///
/// Labels are joined by line breaks to form the gutter's own text, which is what character
/// offsets on this surface refer to.
pub struct GutterSurface {
    labels: Vec<String>,
    starts: Vec<usize>,
    char_count: usize,
    top: usize,
    height: usize,
    caret: Selection,
    zoom: u16,
}

impl GutterSurface {
    #[must_use]
    /// A gutter labelling `visual`.
    pub fn new(visual: &[VisualLine], zoom: u16) -> Self {
        let mut gutter = Self {
            labels: Vec::new(),
            starts: Vec::new(),
            char_count: 0,
            top: 0,
            height: 1,
            caret: Selection::default(),
            zoom: clamp_zoom(zoom),
        };
        gutter.rebuild(visual);
        gutter
    }

    /// Relabel after the document was rewrapped or reloaded, keeping the scroll position.
    pub fn rebuild(&mut self, visual: &[VisualLine]) {
        self.labels = visual
            .iter()
            .map(|v| {
                if v.continuation {
                    String::new()
                } else {
                    (v.logical + 1).to_string()
                }
            })
            .collect();
        if self.labels.is_empty() {
            self.labels.push("1".to_string());
        }

        self.starts.clear();
        let mut offset = 0;
        for label in &self.labels {
            self.starts.push(offset);
            offset += label.chars().count() + 1;
        }
        self.char_count = offset - 1;
        self.top = self.top.min(self.labels.len() - 1);
        self.caret.start = self.caret.start.min(self.char_count);
    }

    /// Set the number of terminal rows available.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    #[must_use]
    /// Columns needed to show the widest label plus a separating space.
    pub fn width(&self) -> u16 {
        let widest = self.labels.iter().map(String::len).max().unwrap_or(1);
        u16::try_from(widest + 1).unwrap_or(u16::MAX)
    }

    #[must_use]
    /// Labels inside the viewport, starting at the top one.
    pub fn visible(&self) -> &[String] {
        let page = lines_per_page(self.height, self.zoom);
        let end = (self.top + page).min(self.labels.len());
        &self.labels[self.top.min(end)..end]
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&s| s <= offset)
            .saturating_sub(1)
    }
}

impl TextSurface for GutterSurface {
    fn visual_line_at_top(&self) -> usize {
        self.top
    }

    fn first_char_of_visual_line(&self, line: usize) -> usize {
        self.starts
            .get(line)
            .or_else(|| self.starts.last())
            .copied()
            .unwrap_or(0)
    }

    fn selection(&self) -> Selection {
        self.caret
    }

    fn select(&mut self, start: usize, length: usize) {
        let start = start.min(self.char_count);
        self.caret = Selection {
            start,
            length: length.min(self.char_count - start),
        };
    }

    /// The caret's line is always brought to the top so both views start on the same row.
    fn scroll_to_caret(&mut self) {
        self.top = self.line_of(self.caret.start);
    }

    fn zoom(&self) -> u16 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u16) {
        self.zoom = clamp_zoom(zoom);
    }
}

#[cfg(test)]
#[path = "tests/surface.rs"]
mod tests;

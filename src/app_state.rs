//! The core state machine bridging the document, its outline and the interactive views.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! scrolls, searches and navigates. Everything derived from the document text (lines, outline,
//! wrapped rows, gutter labels) is rebuilt wholesale from the store on every load, so nothing
//! can go stale across a save.

use crate::line::{self, Line, TextPosition};
use crate::outline::{build_outline_with, MarkerMatch};
use crate::outline_view::OutlineView;
use crate::search::{self, SearchMatch};
use crate::store::{DocumentStore, StoreError};
use crate::surface::{DocumentSurface, GutterSurface};
use crate::view_sync::{TextSurface, ViewSynchronizer};
use edtui::{EditorState, Lines};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{info, warn};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Outline, gutter and read-only document with caret, scrolling and highlights.
    Read,
    /// Vim-like editor over the whole document.
    Edit,
    /// Captures a search query after '/' is pressed.
    Search,
    /// Captures vim-style command input after ':' is pressed.
    Command,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Pane receiving keyboard navigation in the read view.
pub enum Focus {
    /// The outline tree.
    Outline,
    /// The document text.
    Document,
}

/// Settings fixed for the lifetime of the session.
pub struct Settings {
    /// How marker lines are recognised.
    pub marker_match: MarkerMatch,
    /// Maximum line width for editor text wrapping.
    pub wrap_width: usize,
    /// Initial zoom factor of both text views.
    pub zoom: u16,
}

/// Bridges the document, its outline and the views, maintaining session state.
pub struct AppState {
    /// Where the document is loaded from and saved to.
    pub store: Box<dyn DocumentStore>,
    /// Line snapshot of the last load.
    pub lines: Vec<Line>,
    /// Outline tree and its fold state.
    pub outline: OutlineView,
    /// Scroll position of the outline list.
    pub outline_state: ListState,
    /// The primary text view.
    pub document: DocumentSurface,
    /// The line-number gutter.
    pub gutter: GutterSurface,
    /// Scroll, zoom and tree-gesture synchronization.
    pub sync: ViewSynchronizer,
    /// Marker matching policy used when building the outline.
    pub marker_match: MarkerMatch,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Pane with keyboard focus in the read view.
    pub focus: Focus,
    /// Editor buffer content when the edit view is active.
    pub editor_state: Option<EditorState>,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Query being typed or last searched.
    pub search_query: String,
    /// Matches of the last search.
    pub matches: Vec<SearchMatch>,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Maximum line width for text wrapping in the editor.
    pub wrap_width: usize,
    /// Screen area of the outline pane, for mouse hit-testing.
    pub outline_area: Rect,
    /// Screen area of the document pane, for mouse hit-testing.
    pub document_area: Rect,
}

impl AppState {
    #[must_use]
    /// Initialises application state and performs the first load.
    pub fn new(store: Box<dyn DocumentStore>, settings: &Settings) -> Self {
        let document = DocumentSurface::new("", settings.wrap_width, settings.zoom);
        let gutter = GutterSurface::new(document.visual_lines(), settings.zoom);

        let mut app = Self {
            store,
            lines: Vec::new(),
            outline: OutlineView::default(),
            outline_state: ListState::default(),
            document,
            gutter,
            sync: ViewSynchronizer::new(),
            marker_match: settings.marker_match,
            current_view: View::Read,
            focus: Focus::Outline,
            editor_state: None,
            command_buffer: String::new(),
            search_query: String::new(),
            matches: Vec::new(),
            message: None,
            wrap_width: settings.wrap_width,
            outline_area: Rect::default(),
            document_area: Rect::default(),
        };
        app.reload();
        app
    }

    #[must_use]
    /// The document text as last loaded.
    pub fn text(&self) -> &str {
        self.document.text()
    }

    /// Load the document from the store and rebuild everything derived from it.
    ///
    /// The outline is rebuilt from scratch and fully expanded, search highlights are dropped,
    /// and the caret returns to the last navigated section.
    pub fn reload(&mut self) {
        let text = self.store.load();
        self.lines = line::split_into_lines(&text);
        self.outline
            .replace(build_outline_with(&self.lines, self.marker_match));
        self.document.set_text(&text);
        self.gutter.rebuild(self.document.visual_lines());
        self.matches.clear();
        self.sync.restore_caret(&mut self.document);
        self.sync_gutter();
        info!(
            lines = self.lines.len(),
            sections = self.outline.rows().len(),
            "document loaded"
        );
    }

    /// Persist `text` and reload so the outline reflects what was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot write the document; nothing is reloaded then.
    pub fn save_text(&mut self, text: &str) -> Result<(), StoreError> {
        self.store.save(text)?;
        self.reload();
        self.message = Some("Saved".to_string());
        Ok(())
    }

    /// Save the editor buffer when editing, otherwise the loaded text.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot write the document.
    pub fn save_current(&mut self) -> Result<(), StoreError> {
        let text = self
            .editor_text()
            .unwrap_or_else(|| self.document.text().to_string());
        self.save_text(&text)
    }

    /// Save and report failure in the status bar instead of propagating it.
    pub fn save_and_report(&mut self) -> bool {
        match self.save_current() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "save failed");
                self.message = Some(format!("Error saving: {e}"));
                false
            }
        }
    }

    #[must_use]
    /// Text currently held by the editor, if the edit view is open.
    pub fn editor_text(&self) -> Option<String> {
        self.editor_state.as_ref().map(|editor_state| {
            editor_state
                .lines
                .iter_row()
                .map(|line| line.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Push the primary view's top line to the gutter if it changed.
    pub fn sync_gutter(&mut self) -> bool {
        self.sync.on_scroll(&self.document, &mut self.gutter)
    }

    /// Adapt both text views to the space the layout gives them.
    pub fn resize(&mut self, width: usize, height: usize) {
        let before = self.document.visual_lines().len();
        self.document.resize(width, height);
        if self.document.visual_lines().len() != before {
            self.gutter.rebuild(self.document.visual_lines());
        }
        self.gutter.set_height(height);
        self.sync_gutter();
    }

    /// Scroll the document by `delta` visual lines.
    pub fn scroll(&mut self, delta: isize) {
        self.document.scroll_by(delta);
        self.sync_gutter();
    }

    /// Scroll the document by whole pages.
    pub fn scroll_page(&mut self, pages: isize) {
        self.document.page_by(pages);
        self.sync_gutter();
    }

    /// Move the caret by characters.
    pub fn move_caret(&mut self, delta: isize) {
        self.document.move_caret(delta);
        self.sync_gutter();
    }

    /// Move the caret by visual lines.
    pub fn move_caret_lines(&mut self, delta: isize) {
        self.document.move_caret_lines(delta);
        self.sync_gutter();
    }

    /// Put the caret under a pointer press at a cell of the document pane.
    pub fn place_caret(&mut self, row: usize, column: usize) {
        let offset = self.document.offset_at_cell(row, column);
        self.document.select(offset, 0);
    }

    /// Change the zoom of the document and carry it over to the gutter.
    pub fn zoom(&mut self, delta: i16) {
        self.document.zoom_by(delta);
        self.sync.on_zoom(&self.document, &mut self.gutter);
        self.sync_gutter();
    }

    /// Highlight every occurrence of the current query.
    ///
    /// A blank query clears the highlights and the query instead.
    pub fn run_search(&mut self) {
        let text = self.document.text().to_string();
        self.matches = self
            .sync
            .apply_search(&text, &self.search_query, &mut self.document);
        if search::is_blank(&self.search_query) {
            self.search_query.clear();
            self.message = None;
        } else {
            info!(query = %self.search_query, count = self.matches.len(), "search");
            self.message = Some(format!("{} matches", self.matches.len()));
        }
        self.sync_gutter();
    }

    /// Search for the selected text, if it is short and not blank.
    pub fn search_selection(&mut self) -> bool {
        let selected = self.document.selected_text();
        match search::selection_query(&selected) {
            Some(query) => {
                self.search_query = query.to_string();
                self.run_search();
                true
            }
            None => false,
        }
    }

    /// Remove all highlights and forget the query.
    pub fn clear_search(&mut self) {
        self.sync.clear_search(&mut self.document);
        self.matches.clear();
        self.search_query.clear();
        self.message = None;
    }

    /// Navigate the document to the selected outline node.
    ///
    /// The node's marker text is searched as written, so its leading space keeps the jump on
    /// the marker line rather than on an earlier bare mention of the title.
    pub fn activate_selected(&mut self) -> Option<usize> {
        let anchor = self.outline.selected_row()?.anchor.clone();
        let text = self.document.text().to_string();
        let found = self.sync.activate(&anchor, &text, &mut self.document);
        self.sync_gutter();
        found
    }

    /// Attempt to collapse or expand the node on `row`.
    ///
    /// Refused while a double click is in progress.
    pub fn request_fold_toggle(&mut self, row: usize) -> bool {
        if !self.sync.allow_fold_toggle() {
            return false;
        }
        self.outline.toggle(row)
    }

    /// Handle a press on a tree row with the given click count.
    ///
    /// A press on the fold glyph requests a fold toggle, which goes through unless the press
    /// is part of a double click. A double click anywhere on the row navigates to the node.
    pub fn tree_pointer_down(&mut self, row: usize, clicks: u8, on_glyph: bool) {
        self.outline.select(row);
        self.sync.on_pointer_down(clicks);
        if on_glyph {
            self.request_fold_toggle(row);
        }
        if clicks > 1 {
            self.activate_selected();
        }
    }

    #[must_use]
    /// Outline row of the section containing the caret.
    pub fn current_section_row(&self) -> Option<usize> {
        self.outline
            .row_for_line(self.document.caret_position().row)
    }

    /// Open the whole document in the editor.
    pub fn enter_edit_view(&mut self) {
        let lines = Lines::from(self.document.text());
        self.editor_state = Some(EditorState::new(lines));
        self.current_view = View::Edit;
    }

    /// Leave the editor, optionally saving, and put the caret where the editor cursor was.
    pub fn exit_edit_view(&mut self, save: bool) {
        if save && !self.save_and_report() {
            return;
        }
        if let Some(editor_state) = self.editor_state.take() {
            let position = TextPosition {
                row: editor_state.cursor.row,
                column: editor_state.cursor.col,
            };
            let offset = line::offset_of(self.document.text(), position);
            self.document.select(offset, 0);
            self.document.scroll_to_caret();
            self.sync_gutter();
        }
        self.current_view = View::Read;
    }

    /// Execute a command typed after ':'. Returns `true` when the application should quit.
    pub fn run_command(&mut self, cmd: &str) -> bool {
        let editing = self.editor_state.is_some();
        self.current_view = if editing { View::Edit } else { View::Read };

        match cmd.trim() {
            "w" => {
                self.save_and_report();
            }
            "x" | "wq" => {
                if editing {
                    self.exit_edit_view(true);
                } else {
                    return self.save_and_report();
                }
            }
            "q" | "q!" => {
                if editing {
                    self.exit_edit_view(false);
                } else {
                    return true;
                }
            }
            "e" | "edit" => {
                if !editing {
                    self.enter_edit_view();
                }
            }
            "noh" | "nohlsearch" => self.clear_search(),
            "r" | "reload" => {
                self.reload();
                self.message = Some("Reloaded".to_string());
            }
            other => {
                self.message = Some(format!("Unknown command: {other}"));
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;

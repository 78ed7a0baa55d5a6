//! The UI renders the application state into something visible and navigable.
//!
//! The screen is split into the outline tree on the left and the document on the right, with
//! the line-number gutter glued to the document's left edge. While editing, the document pane
//! hosts the vim-like editor instead. A one-line bar at the bottom shows help, status, or the
//! query/command being typed.

use crate::app_state::{AppState, Focus, View};
use crate::search::SearchMatch;
use crate::view_sync::{Selection, TextSurface};
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const HIGHLIGHT: Color = Color::Rgb(255, 165, 0); // Orange

const OUTLINE_HELP: &str =
    "↑/↓: Select | Enter: Go to | Space: Fold | Tab: Text | /: Search | e: Edit | +/-: Zoom | q: Quit";
const DOCUMENT_HELP: &str = "↑/↓/←/→: Caret | Shift+←/→: Select | Ctrl+F: Find selection | PgUp/PgDn: Scroll | Tab: Outline | q: Quit";
const EDIT_HELP: &str = ":w Save | :x Save & Exit | :q Discard | Esc: Back (normal mode) | Ctrl+S: Save";

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Min(0)])
        .split(chunks[0]);

    draw_outline(f, app, panes[0]);

    if app.editor_state.is_some() {
        draw_editor(f, app, panes[1]);
    } else {
        draw_document(f, app, panes[1]);
    }

    draw_status(f, app, chunks[1]);
}

fn focus_border(app: &AppState, pane: Focus) -> Style {
    if app.focus == pane && app.current_view == View::Read {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_outline(f: &mut Frame, app: &mut AppState, area: Rect) {
    app.outline_area = area;
    let current = app.current_section_row();

    let items: Vec<ListItem> = app
        .outline
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let glyph = match (row.has_children, row.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            let mut style = match row.depth {
                0 => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                1 => Style::default().fg(Color::Green),
                2 => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };
            if current == Some(i) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::raw(glyph),
                Span::styled(row.title.clone(), style),
            ]))
        })
        .collect();

    let title = format!("Outline ({} sections)", app.outline.rows().len());
    let mut list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(app, Focus::Outline))
            .title(title),
    );
    if app.focus == Focus::Outline {
        list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    let selected = (!app.outline.rows().is_empty()).then(|| app.outline.selected());
    app.outline_state.select(selected);
    f.render_stateful_widget(list, area, &mut app.outline_state);
}

/// Whether `offset` falls inside one of the equally long, ascending `matches`.
fn is_highlighted(matches: &[SearchMatch], offset: usize) -> bool {
    let after = matches.partition_point(|m| m.start <= offset);
    after > 0 && matches[after - 1].end() > offset
}

fn char_style(app: &AppState, offset: usize, selection: Selection) -> Style {
    let mut style = Style::default();
    if is_highlighted(app.document.highlights(), offset) {
        style = style.bg(HIGHLIGHT).fg(Color::Black);
    }
    let selected = offset >= selection.start && offset < selection.start + selection.length;
    let caret = offset == selection.start && app.focus == Focus::Document;
    if selected || caret {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// Build the spans of visual row `index`, merging runs of equally styled characters.
fn render_row(app: &AppState, chars: &[char], index: usize) -> Line<'static> {
    let visual = app.document.visual_lines();
    let row = visual[index];
    let selection = app.document.selection();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for offset in row.start..row.start + row.len {
        let style = char_style(app, offset, selection);
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(chars.get(offset).copied().unwrap_or(' '));
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    // A caret on the line break is drawn after the last row of its logical line.
    let wraps_on = visual.get(index + 1).is_some_and(|next| next.continuation);
    if app.focus == Focus::Document && selection.start == row.start + row.len && !wraps_on {
        spans.push(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    Line::from(spans)
}

/// Repeat each row `zoom` times in height by padding with empty rows.
fn zoomed<'a>(rows: impl IntoIterator<Item = Line<'a>>, zoom: u16) -> Vec<Line<'a>> {
    let padding = usize::from(zoom.saturating_sub(1));
    rows.into_iter()
        .flat_map(|row| std::iter::once(row).chain(std::iter::repeat_n(Line::default(), padding)))
        .collect()
}

fn draw_document(f: &mut Frame, app: &mut AppState, area: Rect) {
    let title = if app.matches.is_empty() {
        "Notes".to_string()
    } else {
        format!("Notes ({} matches for \"{}\")", app.matches.len(), app.search_query)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app, Focus::Document))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(app.gutter.width()), Constraint::Min(0)])
        .split(inner);
    let (gutter_area, text_area) = (columns[0], columns[1]);

    app.document_area = text_area;
    app.resize(
        usize::from(text_area.width),
        usize::from(text_area.height),
    );

    let label_width = usize::from(app.gutter.width().saturating_sub(1));
    let labels = app
        .gutter
        .visible()
        .iter()
        .map(|label| Line::from(format!("{label:>label_width$}")));
    let gutter = Paragraph::new(zoomed(labels, app.gutter.zoom()))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(gutter, gutter_area);

    let chars: Vec<char> = app.text().chars().collect();
    let top = app.document.visual_line_at_top();
    let rows: Vec<Line> = (top..top + app.document.visible().len())
        .map(|index| render_row(app, &chars, index))
        .collect();
    f.render_widget(Paragraph::new(zoomed(rows, app.document.zoom())), text_area);
}

fn draw_editor(f: &mut Frame, app: &mut AppState, area: Rect) {
    app.document_area = area;
    let title = format!("Editing (max line: {} chars)", app.wrap_width);

    if let Some(ref mut editor_state) = app.editor_state {
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    }
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    let help = match (app.current_view, app.focus) {
        (View::Edit, _) => EDIT_HELP,
        (_, Focus::Outline) => OUTLINE_HELP,
        (_, Focus::Document) => DOCUMENT_HELP,
    };
    let (title, text) = match app.current_view {
        View::Search => ("Search", format!("/{}", app.search_query)),
        View::Command => ("Command", format!(":{}", app.command_buffer)),
        View::Read | View::Edit => ("", app.message.clone().unwrap_or_else(|| help.to_string())),
    };

    let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;

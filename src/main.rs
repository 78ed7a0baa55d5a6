//! notemark: terminal notes with a marker-driven outline.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use notemark::app_state::{self, AppState, Focus, View};
use notemark::store::{self, DocumentStore};
use notemark::{config, input, line, outline, search, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Visual lines moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

#[derive(Parser)]
#[command(name = "notemark")]
#[command(about = "Terminal notes with a marker-driven outline", long_about = None)]
struct Args {
    /// Note document to open
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Print the outline as JSON and exit
    #[arg(long)]
    outline: bool,

    /// Print the matches of QUERY as JSON and exit
    #[arg(long, value_name = "QUERY")]
    find: Option<String>,

    /// Match markers by plain prefix, so ##1 also matches ##10
    #[arg(long)]
    legacy_markers: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(path) = args.path {
        cfg.document_path = path.to_string_lossy().to_string();
    }
    if args.legacy_markers {
        cfg.legacy_markers = true;
    }

    let one_shot = args.outline || args.find.is_some();
    init_logging(&cfg, one_shot)?;

    let store = store::FileStore::new(&cfg.document_path);

    if one_shot {
        return print_report(&store, &cfg, args.outline, args.find.as_deref());
    }

    let settings = app_state::Settings {
        marker_match: cfg.marker_match(),
        wrap_width: cfg.wrap_width,
        zoom: cfg.zoom,
    };
    let state = AppState::new(Box::new(store), &settings);

    run_tui(state, &cfg)
}

/// Send logs to stderr for one-shot commands, and to the configured file (or nowhere) while
/// the TUI owns the terminal.
fn init_logging(cfg: &config::Config, to_stderr: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    if to_stderr {
        builder.with_writer(io::stderr).init();
    } else if cfg.log_file.is_empty() {
        builder.with_writer(io::sink).init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cfg.log_file)?;
        builder.with_writer(Mutex::new(file)).init();
    }
    Ok(())
}

fn print_report(
    store: &store::FileStore,
    cfg: &config::Config,
    show_outline: bool,
    query: Option<&str>,
) -> io::Result<()> {
    let text = store.load();

    if show_outline {
        let lines = line::split_into_lines(&text);
        let tree = outline::build_outline_with(&lines, cfg.marker_match());
        let json = serde_json::to_string_pretty(&tree).map_err(io::Error::other)?;
        println!("{json}");
    }

    if let Some(query) = query {
        let matches = search::find_all(&text, query);
        let json = serde_json::to_string_pretty(&matches).map_err(io::Error::other)?;
        println!("{json}");
    }

    Ok(())
}

fn run_tui(mut app: AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();
    let mut clicks = input::ClickTracker::new(cfg.double_click_ms);

    let result = run_app(&mut terminal, &mut app, &mut editor_handler, &mut clicks);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else {
        info!("session closed");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    editor_handler: &mut EditorEventHandler,
    clicks: &mut input::ClickTracker,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key, editor_handler) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse, clicks),
            // Resizes are picked up by the next draw, which re-lays out both text views.
            _ => {}
        }
    }
}

/// Dispatch a key press. Returns `true` when the application should quit.
fn handle_key(app: &mut AppState, key: KeyEvent, editor_handler: &mut EditorEventHandler) -> bool {
    match app.current_view {
        View::Read => return handle_read_key(app, key),
        View::Edit => {
            let normal = app
                .editor_state
                .as_ref()
                .is_some_and(|editor_state| editor_state.mode == edtui::EditorMode::Normal);
            match key.code {
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.save_and_report();
                }
                KeyCode::Char(':') if normal => {
                    app.current_view = View::Command;
                    app.command_buffer.clear();
                    app.message = None;
                }
                KeyCode::Esc if normal => app.exit_edit_view(false),
                _ => {
                    if let Some(ref mut editor_state) = app.editor_state {
                        editor_handler.on_key_event(key, editor_state);
                    }
                }
            }
        }
        View::Search => match key.code {
            KeyCode::Char(c) => app.search_query.push(c),
            KeyCode::Backspace => {
                app.search_query.pop();
            }
            KeyCode::Enter => {
                app.current_view = View::Read;
                app.run_search();
            }
            KeyCode::Esc => {
                app.current_view = View::Read;
                app.search_query.clear();
            }
            _ => {}
        },
        View::Command => match key.code {
            KeyCode::Char(c) => app.command_buffer.push(c),
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let cmd = app.command_buffer.clone();
                app.command_buffer.clear();
                return app.run_command(&cmd);
            }
            KeyCode::Esc => {
                app.current_view = if app.editor_state.is_some() {
                    View::Edit
                } else {
                    View::Read
                };
                app.command_buffer.clear();
            }
            _ => {}
        },
    }
    false
}

fn handle_read_key(app: &mut AppState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('f') if ctrl => {
            if !app.search_selection() {
                app.message = Some("Select some text to search for".to_string());
            }
        }
        KeyCode::Char('s') if ctrl => {
            app.save_and_report();
        }
        KeyCode::Char(':') => {
            app.current_view = View::Command;
            app.command_buffer.clear();
            app.message = None;
        }
        KeyCode::Char('/') => {
            app.current_view = View::Search;
            app.search_query.clear();
        }
        KeyCode::Char('e' | 'i') => app.enter_edit_view(),
        KeyCode::Char('+' | '=') => app.zoom(1),
        KeyCode::Char('-') => app.zoom(-1),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Outline => Focus::Document,
                Focus::Document => Focus::Outline,
            };
        }
        KeyCode::PageUp => app.scroll_page(-1),
        KeyCode::PageDown => app.scroll_page(1),
        code => match app.focus {
            Focus::Outline => match code {
                KeyCode::Up | KeyCode::Char('k') => app.outline.select_by(-1),
                KeyCode::Down | KeyCode::Char('j') => app.outline.select_by(1),
                KeyCode::Enter => {
                    app.activate_selected();
                }
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    app.request_fold_toggle(app.outline.selected());
                }
                _ => {}
            },
            Focus::Document => match code {
                KeyCode::Up => app.move_caret_lines(-1),
                KeyCode::Down => app.move_caret_lines(1),
                KeyCode::Left if shift => app.document.extend_selection(-1),
                KeyCode::Right if shift => app.document.extend_selection(1),
                KeyCode::Left => app.move_caret(-1),
                KeyCode::Right => app.move_caret(1),
                _ => {}
            },
        },
    }
    false
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent, clicks: &mut input::ClickTracker) {
    if app.current_view != View::Read {
        return;
    }
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown if contains(app.document_area, column, row) => {
            app.scroll(WHEEL_STEP);
        }
        MouseEventKind::ScrollUp if contains(app.document_area, column, row) => {
            app.scroll(-WHEEL_STEP);
        }
        MouseEventKind::Down(MouseButton::Left) if contains(app.outline_area, column, row) => {
            app.focus = Focus::Outline;
            // Rows start below the pane's top border.
            let Some(offset) = row.checked_sub(app.outline_area.y + 1) else {
                return;
            };
            let index = app.outline_state.offset() + usize::from(offset);
            let Some(depth) = app.outline.rows().get(index).map(|r| r.depth) else {
                clicks.reset();
                return;
            };

            let glyph = app.outline_area.x + 1 + u16::try_from(depth * 2).unwrap_or(u16::MAX);
            let on_glyph = column >= glyph && column < glyph.saturating_add(2);
            let count = clicks.press(row, Instant::now());
            app.tree_pointer_down(index, count, on_glyph);
        }
        MouseEventKind::Down(MouseButton::Left) if contains(app.document_area, column, row) => {
            app.focus = Focus::Document;
            app.place_caret(
                usize::from(row - app.document_area.y),
                usize::from(column - app.document_area.x),
            );
        }
        _ => {}
    }
}

//! notemark: plain-text notes navigated through an outline built from `##<level>` marker lines.
//!
//! The core ([`line`], [`outline`], [`search`], [`view_sync`]) is pure and independent of the
//! terminal. The remaining modules persist the document and present it as a TUI with an
//! outline pane, a wrapped document view and a line-number gutter kept in step with it.
#![allow(clippy::multiple_crate_versions)]

/// Application state and the operations the key and mouse handlers invoke.
pub mod app_state;
/// Configuration loaded from `notemark.toml`.
pub mod config;
/// Click counting for terminal mouse input.
pub mod input;
/// Splitting text into numbered lines and converting between offsets and positions.
pub mod line;
/// Outline synthesis from marker lines.
pub mod outline;
/// Flattened, foldable presentation of the outline tree.
pub mod outline_view;
/// Substring search over the document.
pub mod search;
/// Loading and saving the note document.
pub mod store;
/// Wrapped document view and line-number gutter.
pub mod surface;
/// Rendering of the application state.
pub mod ui;
/// Keeping the gutter, outline and document views consistent.
pub mod view_sync;

//! Line model: the single source of truth for line boundaries.
//!
//! Every other part of the crate that reasons about rows (the outline synthesizer, the gutter,
//! caret placement after a search hit) goes through this module, so that line arithmetic and
//! character-offset arithmetic always agree. Rows are delimited by `\n`; a `\r` immediately
//! before it belongs to the break, not to the line text.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One logical line of the document, snapshotted at load time.
pub struct Line {
    /// Zero-based position of the line in document order.
    pub index: usize,
    /// Line content without its line break.
    pub text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// A caret position expressed as a logical row and a character column.
pub struct TextPosition {
    /// Zero-based logical line.
    pub row: usize,
    /// Zero-based character column within the row.
    pub column: usize,
}

#[must_use]
/// Split document text into indexed lines, preserving empty lines.
///
/// An empty document is a single empty line, and a trailing newline produces a trailing empty
/// line, matching what a text surface reports for the same content.
pub fn split_into_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| Line {
            index,
            text: raw.strip_suffix('\r').unwrap_or(raw).to_string(),
        })
        .collect()
}

#[must_use]
/// Character offset at which each logical line starts, one entry per [`split_into_lines`] line.
pub fn line_offsets(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        text.chars()
            .enumerate()
            .filter(|&(_, ch)| ch == '\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

#[must_use]
/// Convert a character offset into a row and column, clamping past-the-end offsets.
pub fn position_of(text: &str, offset: usize) -> TextPosition {
    let mut position = TextPosition::default();
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            position.row += 1;
            position.column = 0;
        } else {
            position.column += 1;
        }
    }
    position
}

#[must_use]
/// Convert a row and column into a character offset.
///
/// Rows past the end clamp to the end of the text; columns past the end of their row clamp to
/// the row's line break.
pub fn offset_of(text: &str, position: TextPosition) -> usize {
    let mut offset = 0;
    let mut row = 0;
    let mut column = 0;
    for ch in text.chars() {
        if row == position.row && (column == position.column || ch == '\n') {
            return offset;
        }
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
        offset += 1;
    }
    offset
}

#[cfg(test)]
#[path = "tests/line.rs"]
mod tests;

//! Outline synthesis from level-tagged marker lines.
//!
//! A marker is a line starting with `##` immediately followed by a level number, e.g.
//! `##1 Introduction` or `##2 Background`. The outline is built level by level: the markers of
//! one level split their enclosing range into sibling sections, and each sibling's range is
//! searched for markers of the next level. Ranges are passed down by value, so the synthesis
//! is a pure function of the line sequence.
//!
//! Markers whose level skips a level (a `##3` with no enclosing `##2`) are never reached by
//! any range search and are left out of the tree.

use crate::line::Line;
use serde::Serialize;
use std::ops::Range;

/// Literal prefix shared by all marker lines.
pub const MARKER_PREFIX: &str = "##";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// How a marker's level token is matched against a requested level.
pub enum MarkerMatch {
    /// The level digits must be followed by a non-digit or the end of the line, so `##1` and
    /// `##10` are distinct levels.
    #[default]
    Exact,
    /// Plain prefix test: `##1` also matches `##10`. Kept for parity with older note files.
    Prefix,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One section of the outline tree.
pub struct OutlineNode {
    /// Marker text without the `##<level>` prefix, trimmed for display.
    pub title: String,
    /// Marker text without the `##<level>` prefix, untouched. This is what locates the
    /// section in the document, so leading spaces keep it off bare occurrences in body text.
    pub anchor: String,
    /// Index of the marker line in the document.
    pub line: usize,
    /// Nested sections, in document order. Empty for a leaf.
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    #[must_use]
    /// Whether the section has no nested sections.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[must_use]
/// Return the text after `##<level>` if `text` is a marker of `level` under `policy`.
///
/// The remainder is returned as written, leading space included.
pub fn marker_title(text: &str, level: usize, policy: MarkerMatch) -> Option<&str> {
    let rest = text
        .strip_prefix(MARKER_PREFIX)?
        .strip_prefix(level.to_string().as_str())?;
    match policy {
        MarkerMatch::Exact if marker_level(text) != Some(level) => None,
        _ => Some(rest),
    }
}

#[must_use]
/// The level written in a marker line, if the line is a marker at all.
pub fn marker_level(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(MARKER_PREFIX)?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    digits.parse().ok().filter(|&level| level > 0)
}

#[must_use]
/// Build the top-level forest using exact marker matching.
pub fn build_outline(lines: &[Line]) -> Vec<OutlineNode> {
    build_outline_with(lines, MarkerMatch::Exact)
}

#[must_use]
/// Build the top-level forest with an explicit marker policy.
pub fn build_outline_with(lines: &[Line], policy: MarkerMatch) -> Vec<OutlineNode> {
    section(lines, 1, 0..lines.len(), policy)
}

/// Collect the markers of `level` inside `range` and recurse into each sibling's sub-range.
///
/// The last sibling's range extends to the end of the enclosing range.
fn section(
    lines: &[Line],
    level: usize,
    range: Range<usize>,
    policy: MarkerMatch,
) -> Vec<OutlineNode> {
    let end = range.end.min(lines.len());
    let scoped = lines.get(range.start.min(end)..end).unwrap_or_default();

    let markers: Vec<(usize, &str)> = scoped
        .iter()
        .filter_map(|line| marker_title(&line.text, level, policy).map(|t| (line.index, t)))
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(index, title))| {
            let boundary = markers.get(i + 1).map_or(end, |&(next, _)| next);
            OutlineNode {
                title: title.trim().to_string(),
                anchor: title.to_string(),
                line: index,
                children: section(lines, level + 1, index..boundary, policy),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;

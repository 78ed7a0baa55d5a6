//! Literal substring search over the document text.
//!
//! Offsets are character offsets into the full text, the same unit the text surfaces use for
//! caret and selection, so a match can be handed straight to the view for highlighting.

use serde::Serialize;

/// Selections at least this many characters long are not turned into search queries.
pub const MAX_SELECTION_QUERY: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// A single occurrence of the query in the text.
pub struct SearchMatch {
    /// Character offset of the first matched character.
    pub start: usize,
    /// Length of the match in characters.
    pub length: usize,
}

impl SearchMatch {
    #[must_use]
    /// Character offset one past the last matched character.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

#[must_use]
/// Whether `query` is empty or whitespace only, in which case no scan is performed.
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Character offsets of every position where `query` starts, scanning left to right.
fn occurrences<'a>(text: &'a str, query: &'a str) -> impl Iterator<Item = usize> + 'a {
    let scan = !is_blank(query);
    text.char_indices()
        .enumerate()
        .filter(move |&(_, (byte, _))| scan && text[byte..].starts_with(query))
        .map(|(offset, _)| offset)
}

#[must_use]
/// Find every occurrence of `query`, overlapping ones included, in ascending offset order.
///
/// The match is case-sensitive and literal. A blank query yields no matches.
pub fn find_all(text: &str, query: &str) -> Vec<SearchMatch> {
    let length = query.chars().count();
    occurrences(text, query)
        .map(|start| SearchMatch { start, length })
        .collect()
}

#[must_use]
/// Character offset of the first occurrence of `query`, if any.
pub fn find_first(text: &str, query: &str) -> Option<usize> {
    occurrences(text, query).next()
}

#[must_use]
/// Accept a selection as a search query if it is non-blank and short.
pub fn selection_query(selected: &str) -> Option<&str> {
    let length = selected.chars().count();
    (!is_blank(selected) && length < MAX_SELECTION_QUERY).then_some(selected)
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;

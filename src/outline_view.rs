//! Fold state and row flattening for the displayed outline tree.
//!
//! The tree itself is immutable; this view model only remembers which nodes are collapsed and
//! which row is selected. Every reload hands it a brand new tree and everything starts out
//! expanded again.

use crate::outline::OutlineNode;
use std::collections::HashSet;

/// Path from the forest root to a node: the child index taken at each depth.
pub type NodePath = Vec<usize>;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A visible row of the tree.
pub struct OutlineRow {
    /// Location of the node in the tree.
    pub path: NodePath,
    /// Nesting depth, 0 for top-level sections.
    pub depth: usize,
    /// Section title.
    pub title: String,
    /// Marker text used to find the section in the document.
    pub anchor: String,
    /// Marker line of the section.
    pub line: usize,
    /// Whether the node can be folded.
    pub has_children: bool,
    /// Whether the node's children are shown.
    pub expanded: bool,
}

#[derive(Debug, Default)]
/// The tree as shown: nodes, fold state, and selection.
pub struct OutlineView {
    roots: Vec<OutlineNode>,
    collapsed: HashSet<NodePath>,
    rows: Vec<OutlineRow>,
    selected: usize,
}

impl OutlineView {
    /// Swap in a freshly built tree, expanding everything.
    pub fn replace(&mut self, roots: Vec<OutlineNode>) {
        self.roots = roots;
        self.expand_all();
    }

    #[must_use]
    /// Rows currently visible, in display order.
    pub fn rows(&self) -> &[OutlineRow] {
        &self.rows
    }

    #[must_use]
    /// Index of the selected row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    /// The selected row, if the tree has any rows.
    pub fn selected_row(&self) -> Option<&OutlineRow> {
        self.rows.get(self.selected)
    }

    /// Select a row, clamped to the visible rows.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.rows.len().saturating_sub(1));
    }

    /// Move the selection by `delta` rows.
    pub fn select_by(&mut self, delta: isize) {
        self.select(self.selected.saturating_add_signed(delta));
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
        self.refresh();
    }

    /// Collapse or expand the node on `row`. Returns whether anything changed.
    pub fn toggle(&mut self, row: usize) -> bool {
        let Some(target) = self.rows.get(row) else {
            return false;
        };
        if !target.has_children {
            return false;
        }
        let path = target.path.clone();
        if !self.collapsed.remove(&path) {
            self.collapsed.insert(path);
        }
        self.refresh();
        true
    }

    #[must_use]
    /// The deepest visible row whose section starts at or before logical line `line`.
    pub fn row_for_line(&self, line: usize) -> Option<usize> {
        self.rows.iter().rposition(|row| row.line <= line)
    }

    fn refresh(&mut self) {
        let mut rows = Vec::new();
        let mut path = Vec::new();
        flatten(&self.roots, &self.collapsed, &mut path, &mut rows);
        self.rows = rows;
        self.select(self.selected);
    }
}

fn flatten(
    nodes: &[OutlineNode],
    collapsed: &HashSet<NodePath>,
    path: &mut NodePath,
    rows: &mut Vec<OutlineRow>,
) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        let expanded = !collapsed.contains(&*path);
        rows.push(OutlineRow {
            path: path.clone(),
            depth: path.len() - 1,
            title: node.title.clone(),
            anchor: node.anchor.clone(),
            line: node.line,
            has_children: !node.is_leaf(),
            expanded,
        });
        if expanded {
            flatten(&node.children, collapsed, path, rows);
        }
        path.pop();
    }
}

#[cfg(test)]
#[path = "tests/outline_view.rs"]
mod tests;

//! Sparse row storage.

use std::collections::{BTreeMap, BTreeSet};

use super::cell::Cell;

/// A sparse row: stored cells by column, plus the columns whose last
/// entered text was non-empty.
#[derive(Debug, Default)]
pub(crate) struct Row {
    pub(crate) cells: BTreeMap<usize, Cell>,
    visible: BTreeSet<usize>,
}

impl Row {
    /// One past the highest visible column, or 0.
    pub(crate) fn width(&self) -> usize {
        self.visible.last().map_or(0, |col| col + 1)
    }

    pub(crate) fn set_visible(&mut self, col: usize, visible: bool) {
        if visible {
            self.visible.insert(col);
        } else {
            self.visible.remove(&col);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

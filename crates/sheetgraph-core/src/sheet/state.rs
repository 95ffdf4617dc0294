use std::collections::{BTreeMap, BTreeSet};

use sheetgraph_formula::{Address, CellLookup, Limits, Value};

use super::cell::{Cell, CellView};
use super::row::Row;
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};

/// Smallest origin-anchored rectangle holding every visible cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

/// A sparse sheet of cells with dependency tracking.
///
/// Cells are stored by address and linked by address, never by reference,
/// so clearing a cell cannot leave a dependent pointing at freed storage.
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) config: SheetConfig,
    pub(crate) rows: BTreeMap<usize, Row>,
    /// Rows with at least one visible cell.
    pub(crate) visible_rows: BTreeSet<usize>,
}

impl Sheet {
    /// Create an empty sheet with default limits.
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    /// Create an empty sheet. The limits stay fixed for its lifetime.
    pub fn with_config(config: SheetConfig) -> Self {
        Sheet {
            config,
            rows: BTreeMap::new(),
            visible_rows: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn limits(&self) -> &Limits {
        &self.config.limits
    }

    /// Parse A1 notation against this sheet's limits.
    pub fn parse_address(&self, text: &str) -> Result<Address> {
        Address::parse(text, &self.config.limits)
            .ok_or_else(|| SheetError::InvalidAddress(text.to_string()))
    }

    pub(crate) fn check_address(&self, addr: Address) -> Result<()> {
        if addr.is_valid(&self.config.limits) {
            Ok(())
        } else {
            Err(SheetError::InvalidAddress(addr.to_string()))
        }
    }

    /// Look up a stored cell. Never creates one.
    pub fn get_cell(&self, addr: Address) -> Result<Option<CellView<'_>>> {
        self.check_address(addr)?;
        Ok(self.cell(addr).map(|cell| CellView { sheet: self, cell }))
    }

    /// Current value of the cell at `addr`, `None` if nothing is stored.
    pub fn value(&self, addr: Address) -> Result<Option<Value>> {
        Ok(self.get_cell(addr)?.map(|view| view.value()))
    }

    /// Text of the cell at `addr`, `None` if nothing is stored.
    pub fn text(&self, addr: Address) -> Result<Option<String>> {
        Ok(self.get_cell(addr)?.map(|view| view.text()))
    }

    pub fn bounding_size(&self) -> Size {
        let Some(last_row) = self.visible_rows.last() else {
            return Size::default();
        };
        // Width comes from every stored row, not only the visible ones.
        let cols = self.rows.values().map(Row::width).max().unwrap_or(0);
        Size {
            rows: last_row + 1,
            cols,
        }
    }

    /// Number of stored cells, placeholders included.
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|row| row.cells.len()).sum()
    }

    pub(crate) fn cell(&self, addr: Address) -> Option<&Cell> {
        self.rows.get(&addr.row)?.cells.get(&addr.col)
    }

    pub(crate) fn cell_mut(&mut self, addr: Address) -> Option<&mut Cell> {
        self.rows.get_mut(&addr.row)?.cells.get_mut(&addr.col)
    }

    /// Materialize a blank cell so an edge can attach to it.
    pub(crate) fn get_or_create_cell(&mut self, addr: Address) -> &mut Cell {
        self.rows
            .entry(addr.row)
            .or_default()
            .cells
            .entry(addr.col)
            .or_insert_with(|| Cell::new_blank(addr))
    }

    /// Remove a cell from storage, dropping its row if that was the last one.
    pub(crate) fn remove_cell(&mut self, addr: Address) {
        if let Some(row) = self.rows.get_mut(&addr.row) {
            row.cells.remove(&addr.col);
            row.set_visible(addr.col, false);
            if row.is_empty() {
                self.rows.remove(&addr.row);
            }
        }
        self.refresh_visible_row(addr.row);
    }

    pub(crate) fn set_visible(&mut self, addr: Address, visible: bool) {
        if let Some(row) = self.rows.get_mut(&addr.row) {
            row.set_visible(addr.col, visible);
        }
        self.refresh_visible_row(addr.row);
    }

    fn refresh_visible_row(&mut self, row: usize) {
        if self.rows.get(&row).is_some_and(|r| r.width() > 0) {
            self.visible_rows.insert(row);
        } else {
            self.visible_rows.remove(&row);
        }
    }
}

impl CellLookup for Sheet {
    fn value_at(&self, addr: Address) -> Option<Value> {
        let value = self
            .cell(addr)
            .filter(|cell| !cell.content().is_blank())
            .map(|_| self.evaluate(addr));
        match value {
            None if self.config.blank_as_zero => Some(Value::Number(0.0)),
            None => self.cell(addr).map(|_| Value::empty()),
            Some(value) => Some(value),
        }
    }
}

use sheetgraph_formula::Address;
use tracing::debug;

use super::Sheet;
use super::cell::Content;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// Validation happens before anything is touched: an invalid address,
    /// a formula that does not parse or one that would close a cycle leaves
    /// the sheet exactly as it was.
    pub fn set_content(&mut self, addr: Address, text: &str) -> Result<()> {
        self.check_address(addr)?;

        if self.cell(addr).is_some_and(|cell| cell.text() == text) {
            return Ok(());
        }

        let content = Content::from_input(text, &self.config.limits)?;
        if let Some(path) = self.find_cycle(addr, content.references()) {
            debug!(cell = %addr, input = text, "rejected circular reference");
            return Err(SheetError::CircularReference { cell: addr, path });
        }

        let parents = content.references().to_vec();
        self.detach_parents(addr);
        self.get_or_create_cell(addr).set_content(content);
        self.attach_parents(addr, &parents);
        self.set_visible(addr, !text.is_empty());
        self.invalidate_from(addr);

        debug!(cell = %addr, parents = parents.len(), "committed cell content");
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// The cell becomes blank and stops reading its parents. Storage is only
    /// released when no other cell still reads it.
    pub fn clear_cell(&mut self, addr: Address) -> Result<()> {
        self.check_address(addr)?;
        if self.cell(addr).is_none() {
            return Ok(());
        }

        self.detach_parents(addr);
        if let Some(cell) = self.cell_mut(addr) {
            cell.set_content(Content::Blank);
        }
        self.set_visible(addr, false);
        self.invalidate_from(addr);
        self.prune_placeholder(addr);

        debug!(cell = %addr, "cleared cell");
        Ok(())
    }

    /// Release every blank cell nothing reads, and any row left empty.
    /// Returns the number of cells removed.
    pub fn compact(&mut self) -> usize {
        let mut removed = 0;
        for row in self.rows.values_mut() {
            let before = row.cells.len();
            row.cells
                .retain(|_, cell| !(cell.content().is_blank() && !cell.is_referenced()));
            removed += before - row.cells.len();
        }
        self.rows.retain(|_, row| !row.is_empty());
        let rows = &self.rows;
        self.visible_rows
            .retain(|row| rows.get(row).is_some_and(|r| r.width() > 0));

        debug!(removed, "compacted sheet");
        removed
    }
}

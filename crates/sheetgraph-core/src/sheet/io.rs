//! Tab-separated bulk export.

use std::io::Write;

use sheetgraph_formula::Address;

use super::Sheet;
use super::cell::CellView;
use crate::error::Result;

impl Sheet {
    /// Write computed values for every cell within the bounding size.
    pub fn export_values<W: Write>(&self, out: &mut W) -> Result<()> {
        self.export_with(out, |view| view.value().to_string())
    }

    /// Write the text of every cell within the bounding size.
    pub fn export_texts<W: Write>(&self, out: &mut W) -> Result<()> {
        self.export_with(out, |view| view.text())
    }

    /// One line per row up to the bounding size; columns separated by tabs,
    /// empty fields for cells that are not stored.
    fn export_with<W, F>(&self, out: &mut W, render: F) -> Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.bounding_size();
        for row in 0..size.rows {
            let mut line = String::new();
            for col in 0..size.cols {
                if col > 0 {
                    line.push('\t');
                }
                if let Some(cell) = self.cell(Address::new(row, col)) {
                    line.push_str(&render(&CellView { sheet: self, cell }));
                }
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

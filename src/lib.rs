//! sheetgraph - in-memory spreadsheet engine.
//!
//! A sparse grid of cells holding text or formulas, with dependency
//! tracking so a formula's value always reflects the cells it reads.
//!
//! ```
//! use sheetgraph::{Sheet, Value};
//!
//! let mut sheet = Sheet::new();
//! let a1 = sheet.parse_address("A1").unwrap();
//! let b1 = sheet.parse_address("B1").unwrap();
//!
//! sheet.set_content(a1, "1").unwrap();
//! sheet.set_content(b1, "=A1 + 1").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Some(Value::Number(2.0)));
//!
//! sheet.set_content(a1, "41").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Some(Value::Number(42.0)));
//! ```

pub use sheetgraph_core::{
    Cell, CellView, Content, ESCAPE_SIGN, FORMULA_SIGN, Result, Sheet, SheetConfig, SheetError,
    Size,
};
pub use sheetgraph_formula::{
    Address, CellLookup, Formula, FormulaError, Limits, ParseError, Value, format_number,
};

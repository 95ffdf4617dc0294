//! sheetgraph-core - sparse sheet storage and dependency graph engine.

pub mod config;
pub mod error;
pub mod sheet;

pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{Cell, CellView, Content, ESCAPE_SIGN, FORMULA_SIGN, Sheet, Size};

pub use sheetgraph_formula::{Address, FormulaError, Limits, Value};

//! sheetgraph_formula - formula capability for the sheetgraph engine.
//!
//! - [`Address`], [`Limits`] - A1 notation ↔ row/col indices, sheet bounds
//! - [`Formula`] - parse, list references, evaluate, render
//! - [`CellLookup`] - read-only sheet access used during evaluation
//! - [`Value`], [`FormulaError`] - computed values, errors included
//! - [`extract_references`], [`preprocess_formula`] - lower-level helpers

pub mod address;
mod builtins;
mod deps;
mod error;
mod eval;
mod formula;
mod preprocess;
mod value;

pub use address::{Address, AddressError, DEFAULT_MAX_COLS, DEFAULT_MAX_ROWS, Limits};
pub use deps::extract_references;
pub use error::ParseError;
pub use eval::{MAX_OPERATIONS, create_engine, shared_engine};
pub use formula::{CellLookup, Formula};
pub use preprocess::{
    MAX_RANGE_CELLS, Preprocessed, RANGE_PREFIX, normalize_expression, preprocess_formula,
    range_member_name,
};
pub use value::{FormulaError, Value, format_number};

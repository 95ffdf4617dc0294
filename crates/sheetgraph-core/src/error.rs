//! Error types for the sheet.

use sheetgraph_formula::{Address, ParseError};
use thiserror::Error;

/// Errors that abort a sheet operation. Evaluation problems are not here:
/// they are values (see `sheetgraph_formula::FormulaError`).
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Circular reference at {cell}: {}", format_path(.path))]
    CircularReference { cell: Address, path: Vec<Address> },

    #[error("Formula error: {0}")]
    FormulaParse(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_path(path: &[Address]) -> String {
    path.iter()
        .map(Address::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;

//! Sheet configuration.
//!
//! ```toml
//! blank_as_zero = true
//!
//! [limits]
//! rows = 1000
//! cols = 26
//! ```

use serde::Deserialize;
use sheetgraph_formula::Limits;

use crate::error::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Row/column bounds, fixed for the lifetime of a sheet.
    pub limits: Limits,
    /// Read blank and missing cells as 0 in formulas instead of `#VALUE!`.
    pub blank_as_zero: bool,
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<SheetConfig> {
        Ok(toml::from_str::<SheetConfig>(content)?)
    }
}

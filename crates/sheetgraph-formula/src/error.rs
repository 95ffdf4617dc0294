//! Formula parse errors.

use thiserror::Error;

/// Why a formula expression could not be turned into a [`crate::Formula`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Range {0} is too large")]
    RangeTooLarge(String),

    #[error("Syntax error: {0}")]
    Syntax(String),
}

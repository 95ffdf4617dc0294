//! Cell addresses and sheet limits.
//!
//! Provides bidirectional conversion between spreadsheet-style addresses
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//! Columns use bijective base-26 letters: A = 1 .. Z = 26, AA = 27. No
//! letter stands for zero.
//!
//! # Examples
//!
//! ```
//! use sheetgraph_formula::{Address, Limits};
//!
//! let limits = Limits::default();
//! let addr = Address::parse("B3", &limits).unwrap();
//! assert_eq!(addr.col, 1);
//! assert_eq!(addr.row, 2);
//! assert_eq!(addr.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_MAX_ROWS: usize = 16_384;
pub const DEFAULT_MAX_COLS: usize = 16_384;

/// Upper bounds (exclusive) for row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub rows: usize,
    pub cols: usize,
}

impl Limits {
    pub fn new(rows: usize, cols: usize) -> Limits {
        Limits { rows, cols }
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.row < self.rows && addr.col < self.cols
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::new(DEFAULT_MAX_ROWS, DEFAULT_MAX_COLS)
    }
}

/// A cell position by row and column indices (0-indexed).
///
/// Ordering is row-major, which is the order references are reported in.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address {
    pub row: usize,
    pub col: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid cell address: {0}")]
pub struct AddressError(pub String);

impl Address {
    pub fn new(row: usize, col: usize) -> Address {
        Address { row, col }
    }

    /// Parse A1 notation, rejecting anything outside `limits`.
    /// Returns None ("no address") for malformed or out-of-range input.
    pub fn parse(text: &str, limits: &Limits) -> Option<Address> {
        Self::parse_unbounded(text).filter(|addr| limits.contains(*addr))
    }

    /// Parse A1 notation without a limit check. Only overflow of the
    /// coordinate types is rejected.
    pub fn parse_unbounded(text: &str) -> Option<Address> {
        let caps = a1_re().captures(text)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Address::new(row, col))
    }

    pub fn is_valid(&self, limits: &Limits) -> bool {
        limits.contains(*self)
    }

    /// Convert column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &Limits::default()).ok_or_else(|| AddressError(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Address::col_to_letters(self.col), self.row + 1)
    }
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").expect("A1 address regex must compile")
    })
}

//! Formula preprocessing.
//!
//! Before formulas can be compiled by Rhai they are rewritten so that they
//! behave like spreadsheet arithmetic:
//!
//! - **Ranges**: `A1:B2` becomes the array literal
//!   `[range_A1, range_B1, range_A2, range_B2]` (row-major), so
//!   `SUM(A1:B2)` calls the array built-in. Members get their own names so
//!   a blank member can be bound differently from a blank scalar reference.
//! - **Numbers**: integer literals become float literals (`1` → `1.0`), so
//!   `1/2` is `0.5` and `1/0` is a non-finite result rather than a
//!   Rhai integer-division error.
//!
//! String literals are left untouched.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::address::Address;
use super::error::ParseError;

/// Largest range (in cells) a single `A1:B2` expression may expand to.
pub const MAX_RANGE_CELLS: usize = 10_000;

/// Name prefix of the scope variable bound to a range member.
pub const RANGE_PREFIX: &str = "range_";

/// A formula rewritten for Rhai.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preprocessed {
    pub script: String,
    /// Cells reached through ranges, row-major and unique. Bound as
    /// `range_<A1>` variables.
    pub range_members: Vec<Address>,
}

/// Rewrite a formula expression into a Rhai expression.
pub fn preprocess_formula(expr: &str) -> Result<Preprocessed, ParseError> {
    let mut script = String::with_capacity(expr.len());
    let mut range_members = Vec::new();
    for segment in split_string_literals(expr) {
        match segment {
            Segment::Literal(s) => script.push_str(s),
            Segment::Code(s) => {
                let expanded = expand_ranges(s, &mut range_members)?;
                script.push_str(&float_literals(&expanded));
            }
        }
    }
    range_members.sort();
    range_members.dedup();
    Ok(Preprocessed {
        script,
        range_members,
    })
}

/// Scope variable name for a range member.
pub fn range_member_name(addr: Address) -> String {
    format!("{RANGE_PREFIX}{addr}")
}

/// Canonical rendering of an expression: trimmed, with whitespace runs
/// outside string literals collapsed to a single space.
pub fn normalize_expression(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    for segment in split_string_literals(expr.trim()) {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Code(s) => {
                let mut pending_space = false;
                for ch in s.chars() {
                    if ch.is_whitespace() {
                        pending_space = true;
                        continue;
                    }
                    if pending_space {
                        out.push(' ');
                        pending_space = false;
                    }
                    out.push(ch);
                }
                if pending_space {
                    out.push(' ');
                }
            }
        }
    }
    out
}

enum Segment<'a> {
    Code(&'a str),
    Literal(&'a str),
}

/// Split into code and `"..."` string-literal segments. An unterminated
/// literal runs to the end of input; the compiler reports it.
fn split_string_literals(expr: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in expr.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                segments.push(Segment::Literal(&expr[start..idx + 1]));
                start = idx + 1;
                in_string = false;
            }
        } else if ch == '"' {
            if start < idx {
                segments.push(Segment::Code(&expr[start..idx]));
            }
            start = idx;
            in_string = true;
        }
    }

    if start < expr.len() {
        let rest = &expr[start..];
        segments.push(if in_string {
            Segment::Literal(rest)
        } else {
            Segment::Code(rest)
        });
    }
    segments
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Z]+[0-9]+)\s*:\s*([A-Z]+[0-9]+)\b").expect("range regex must compile")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([0-9]+)(\.[0-9]+)?([eE][+-]?[0-9]+)?\b").expect("number regex must compile")
    })
}

fn expand_ranges(code: &str, members: &mut Vec<Address>) -> Result<String, ParseError> {
    let re = range_re();
    let mut out = String::with_capacity(code.len());
    let mut last = 0;

    for caps in re.captures_iter(code) {
        let whole = caps.get_match();
        out.push_str(&code[last..whole.start()]);
        out.push_str(&expand_range(&caps[1], &caps[2], members)?);
        last = whole.end();
    }
    out.push_str(&code[last..]);
    Ok(out)
}

fn expand_range(start: &str, end: &str, members: &mut Vec<Address>) -> Result<String, ParseError> {
    let range = format!("{start}:{end}");
    let (Some(start), Some(end)) = (Address::parse_unbounded(start), Address::parse_unbounded(end))
    else {
        return Err(ParseError::InvalidRange(range));
    };

    let min_row = start.row.min(end.row);
    let max_row = start.row.max(end.row);
    let min_col = start.col.min(end.col);
    let max_col = start.col.max(end.col);

    let cells = (max_row - min_row)
        .checked_add(1)
        .zip((max_col - min_col).checked_add(1))
        .and_then(|(rows, cols)| rows.checked_mul(cols));
    match cells {
        Some(cells) if cells <= MAX_RANGE_CELLS => {}
        _ => return Err(ParseError::RangeTooLarge(range)),
    }

    let mut names = Vec::new();
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            let addr = Address::new(row, col);
            names.push(range_member_name(addr));
            members.push(addr);
        }
    }
    Ok(format!("[{}]", names.join(", ")))
}

fn float_literals(code: &str) -> String {
    number_re()
        .replace_all(code, |caps: &Captures| {
            if caps.get(2).is_some() || caps.get(3).is_some() {
                caps[0].to_string()
            } else {
                format!("{}.0", &caps[1])
            }
        })
        .to_string()
}

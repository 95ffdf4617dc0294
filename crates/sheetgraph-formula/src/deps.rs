//! Reference extraction from formula text.
//!
//! Scans a (preprocessed) formula for cell references (e.g. `A1`, `B2`).
//! The result feeds the dependency graph for cycle detection and cache
//! invalidation, and tells the evaluator which scope variables to bind.
//!
//! Ranges are expanded into their member references by preprocessing, so
//! only single references need to be recognised here. References inside
//! string literals are ignored.

use regex::Regex;
use std::sync::OnceLock;

use super::address::Address;

/// Extract every cell reference from a script, sorted row-major and
/// de-duplicated. Coordinates are not checked against any limits.
pub fn extract_references(script: &str) -> Vec<Address> {
    let script = strip_string_literals(script);

    let mut refs: Vec<Address> = cell_ref_re()
        .find_iter(&script)
        .filter_map(|m| Address::parse_unbounded(m.as_str()))
        .collect();
    refs.sort();
    refs.dedup();
    refs
}

/// Like [`extract_references`] but keeps the token text, including tokens
/// whose coordinates overflow. Used to bind scope variables by name.
pub(crate) fn reference_tokens(script: &str) -> Vec<String> {
    let script = strip_string_literals(script);

    let mut tokens: Vec<String> = cell_ref_re()
        .find_iter(&script)
        .map(|m| m.as_str().to_string())
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

pub(crate) fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Z]+[0-9]+\b").expect("dependency cell reference regex must compile")
    })
}

/// Replace each character inside a string literal with a space, keeping
/// the quotes.
pub(crate) fn strip_string_literals(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in script.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(' ');
                continue;
            }
            if ch == '\\' {
                escaped = true;
                out.push(' ');
                continue;
            }
            if ch == '"' {
                in_string = false;
                out.push('"');
            } else {
                out.push(' ');
            }
        } else if ch == '"' {
            in_string = true;
            out.push('"');
        } else {
            out.push(ch);
        }
    }

    out
}

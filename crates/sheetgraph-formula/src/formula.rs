//! Parsed formulas.
//!
//! A [`Formula`] is the compiled form of the text after the `=` marker. It
//! knows which cells it reads, can evaluate itself against a read-only
//! view of the sheet and renders back to canonical text.
//!
//! Referenced cells are bound into the Rhai scope before evaluation:
//!
//! - a scalar reference (`A1`) must resolve to a number; blank, missing and
//!   non-numeric cells make the whole formula `#VALUE!`
//! - a range member (`A1` in `SUM(A1:A3)`) is bound as `()` when the cell
//!   is blank or missing, so the aggregate built-ins can skip it
//!
//! Numbers are bound as Rhai floats, so concatenating one with a string
//! uses Rhai's float formatting (`1 + "x"` gives `"1.0x"`), not the
//! sheet's display form.

use rhai::{AST, Dynamic, Scope};

use super::address::{Address, Limits};
use super::deps::{extract_references, reference_tokens};
use super::error::ParseError;
use super::eval::{shared_engine, value_from_dynamic, value_from_error};
use super::preprocess::{normalize_expression, preprocess_formula, range_member_name};
use super::value::{FormulaError, Value};

/// Read access to computed cell values.
pub trait CellLookup {
    /// Value of the cell at `addr`, or `None` when no cell is stored there.
    fn value_at(&self, addr: Address) -> Option<Value>;
}

#[derive(Clone, Debug)]
pub struct Formula {
    expression: String,
    ast: AST,
    /// Referenced cells inside the limits, row-major, unique.
    references: Vec<Address>,
    /// Every scalar reference token in the compiled script, bound by name.
    tokens: Vec<String>,
    /// Cells reached through ranges, bound as `range_<A1>`.
    range_members: Vec<Address>,
    limits: Limits,
}

impl Formula {
    /// Parse and compile a formula expression (without the leading `=`).
    pub fn parse(expr: &str, limits: &Limits) -> Result<Formula, ParseError> {
        let expression = normalize_expression(expr);
        if expression.is_empty() {
            return Err(ParseError::Syntax("empty expression".to_string()));
        }

        let processed = preprocess_formula(&expression)?;
        let ast = shared_engine()
            .compile_expression(&processed.script)
            .map_err(|e| ParseError::Syntax(e.to_string()))?;

        let mut references: Vec<Address> = extract_references(&processed.script)
            .into_iter()
            .chain(processed.range_members.iter().copied())
            .filter(|addr| limits.contains(*addr))
            .collect();
        references.sort();
        references.dedup();

        Ok(Formula {
            expression,
            ast,
            references,
            tokens: reference_tokens(&processed.script),
            range_members: processed.range_members,
            limits: *limits,
        })
    }

    /// Canonical expression text, without the `=` marker.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn referenced_cells(&self) -> &[Address] {
        &self.references
    }

    /// Evaluate against `lookup`. Never fails: problems surface as
    /// [`Value::Error`].
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> Value {
        let mut bindings = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            match Address::parse_unbounded(token).filter(|addr| self.limits.contains(*addr)) {
                Some(addr) => bindings.push((token, addr)),
                None => return Value::Error(FormulaError::Ref),
            }
        }
        if self.range_members.iter().any(|addr| !self.limits.contains(*addr)) {
            return Value::Error(FormulaError::Ref);
        }

        let mut scope = Scope::new();
        for (token, addr) in bindings {
            match operand(lookup.value_at(addr)) {
                Ok(n) => {
                    scope.push(token.as_str(), n);
                }
                Err(e) => return Value::Error(e),
            }
        }
        for &addr in &self.range_members {
            match range_operand(lookup.value_at(addr)) {
                Ok(value) => {
                    scope.push_dynamic(range_member_name(addr), value);
                }
                Err(e) => return Value::Error(e),
            }
        }

        match shared_engine().eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast) {
            Ok(value) => value_from_dynamic(value),
            Err(err) => value_from_error(&err),
        }
    }
}

/// Interpret a referenced cell's value as a number.
fn operand(value: Option<Value>) -> Result<f64, FormulaError> {
    match value {
        Some(Value::Number(n)) => Ok(n),
        Some(Value::Text(text)) => text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(FormulaError::Value),
        Some(Value::Error(e)) => Err(e),
        None => Err(FormulaError::Value),
    }
}

/// Like [`operand`], but blank and missing cells become `()`.
fn range_operand(value: Option<Value>) -> Result<Dynamic, FormulaError> {
    match value {
        None => Ok(Dynamic::UNIT),
        Some(Value::Text(text)) if text.is_empty() => Ok(Dynamic::UNIT),
        other => operand(other).map(Dynamic::from),
    }
}

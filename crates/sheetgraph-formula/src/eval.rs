//! Rhai engine creation and result conversion.
//!
//! All formulas share one engine with the spreadsheet built-ins
//! registered. Formulas never mutate the sheet: referenced cells are bound
//! as scope variables before evaluation, so the engine needs no access to
//! sheet storage.

use rhai::{Dynamic, Engine, EvalAltResult};
use std::sync::OnceLock;

use super::value::{FormulaError, Value};

/// Upper bound on Rhai operations per evaluation.
pub const MAX_OPERATIONS: u64 = 100_000;

/// Create a Rhai engine with built-ins registered.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// The engine shared by every formula.
pub fn shared_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(create_engine)
}

/// Convert an evaluation result into a cell value.
pub(crate) fn value_from_dynamic(value: Dynamic) -> Value {
    if value.is_unit() {
        Value::empty()
    } else if let Ok(n) = value.as_float() {
        if n.is_finite() {
            Value::Number(n)
        } else {
            Value::Error(FormulaError::Arithmetic)
        }
    } else if let Ok(n) = value.as_int() {
        Value::Number(n as f64)
    } else if let Ok(b) = value.as_bool() {
        Value::Text(if b { "TRUE" } else { "FALSE" }.to_string())
    } else if value.is_string() {
        Value::Text(value.into_string().unwrap_or_default())
    } else {
        Value::Error(FormulaError::Value)
    }
}

/// Convert an evaluation failure into an error value.
pub(crate) fn value_from_error(err: &EvalAltResult) -> Value {
    match err {
        EvalAltResult::ErrorArithmetic(..) => Value::Error(FormulaError::Arithmetic),
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => value_from_error(inner),
        _ => Value::Error(FormulaError::Value),
    }
}

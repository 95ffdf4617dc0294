//! Built-in spreadsheet functions.
//!
//! Conventions:
//! - Spreadsheet-facing built-in names are ALL CAPS (e.g. `SUM`, `AVG`).
//! - Built-ins take a Rhai array; ranges are preprocessed into array
//!   literals, so `SUM(A1:A3)` arrives here as `SUM([A1, A2, A3])`.
//! - Blank range members arrive as `()` and are skipped.

use rhai::{Array, Engine, EvalAltResult, Position};

fn invalid_arg(message: &str) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(message.into(), Position::NONE).into()
}

/// Numeric elements of `values`, skipping `()`.
fn numbers(values: &Array) -> Result<Vec<f64>, Box<EvalAltResult>> {
    values
        .iter()
        .filter(|v| !v.is_unit())
        .map(|v| {
            v.as_float()
                .ok()
                .or_else(|| v.as_int().ok().map(|n| n as f64))
                .ok_or_else(|| invalid_arg(&format!("expected a number, got {}", v.type_name())))
        })
        .collect()
}

/// Register all built-ins on `engine`.
pub fn register_builtins(engine: &mut Engine) {
    engine.register_fn("SUM", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(numbers(&values)?.iter().sum())
    });

    // An empty average is 0/0; the caller turns the NaN into #ARITHM!.
    engine.register_fn("AVG", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        let nums = numbers(&values)?;
        Ok(nums.iter().sum::<f64>() / nums.len() as f64)
    });

    engine.register_fn("COUNT", |values: Array| -> f64 {
        values.iter().filter(|v| !v.is_unit()).count() as f64
    });

    engine.register_fn("MIN", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(numbers(&values)?.into_iter().reduce(f64::min).unwrap_or(0.0))
    });

    engine.register_fn("MAX", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        Ok(numbers(&values)?.into_iter().reduce(f64::max).unwrap_or(0.0))
    });

    // Scalar forms so `SUM(A1)` reads naturally.
    for name in ["SUM", "AVG", "MIN", "MAX"] {
        engine.register_fn(name, |value: f64| -> f64 { value });
    }
    engine.register_fn("COUNT", |_value: f64| -> f64 { 1.0 });
}

//! End-to-end behaviour of the sheet through the public API.

use pretty_assertions::assert_eq;
use sheetgraph::{Address, FormulaError, Limits, Sheet, SheetConfig, SheetError, Size, Value};

fn a(text: &str) -> Address {
    text.parse().expect("test address must parse")
}

fn values(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.export_values(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn texts(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.export_texts(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_formula_follows_its_parent() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "1").unwrap();
    sheet.set_content(a("B1"), "=A1").unwrap();
    assert_eq!(sheet.value(a("B1")).unwrap(), Some(Value::Number(1.0)));

    sheet.set_content(a("A1"), "2").unwrap();
    assert_eq!(sheet.value(a("B1")).unwrap(), Some(Value::Number(2.0)));
}

#[test]
fn test_two_cell_cycle_is_rejected() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "=B1").unwrap();
    let before = sheet.text(a("B1")).unwrap();

    let err = sheet.set_content(a("B1"), "=A1").unwrap_err();
    match err {
        SheetError::CircularReference { cell, path } => {
            assert_eq!(cell, a("B1"));
            assert_eq!(path, vec![a("B1"), a("A1"), a("B1")]);
        }
        other => panic!("expected circular reference, got {other:?}"),
    }
    assert_eq!(sheet.text(a("B1")).unwrap(), before);
    assert!(!sheet.get_cell(a("A1")).unwrap().unwrap().is_referenced());
}

#[test]
fn test_longer_cycle_through_ranges_is_rejected() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("C3"), "=SUM(A1:B2)").unwrap();
    sheet.set_content(a("D4"), "=C3 * 2").unwrap();
    let err = sheet.set_content(a("B2"), "=D4").unwrap_err();
    assert!(matches!(err, SheetError::CircularReference { .. }));
}

#[test]
fn test_diamond_recomputes_after_root_change() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "1").unwrap();
    sheet.set_content(a("B1"), "=A1 * 10").unwrap();
    sheet.set_content(a("C1"), "=A1 * 100").unwrap();
    sheet.set_content(a("D1"), "=B1 + C1").unwrap();
    assert_eq!(sheet.value(a("D1")).unwrap(), Some(Value::Number(110.0)));

    sheet.set_content(a("A1"), "2").unwrap();
    assert_eq!(sheet.value(a("D1")).unwrap(), Some(Value::Number(220.0)));
    assert_eq!(sheet.value(a("B1")).unwrap(), Some(Value::Number(20.0)));
}

#[test]
fn test_errors_flow_through_dependents() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "=1/0").unwrap();
    sheet.set_content(a("A2"), "=A1 + 1").unwrap();
    sheet.set_content(a("A3"), "text").unwrap();
    sheet.set_content(a("A4"), "=A3 * 2").unwrap();

    assert_eq!(
        sheet.value(a("A2")).unwrap(),
        Some(Value::Error(FormulaError::Arithmetic))
    );
    assert_eq!(
        sheet.value(a("A4")).unwrap(),
        Some(Value::Error(FormulaError::Value))
    );
}

#[test]
fn test_reference_outside_limits_is_ref_error() {
    let mut sheet = Sheet::with_config(SheetConfig {
        limits: Limits::new(100, 10),
        ..SheetConfig::default()
    });
    sheet.set_content(a("A1"), "=Z1 + 1").unwrap();
    assert_eq!(
        sheet.value(a("A1")).unwrap(),
        Some(Value::Error(FormulaError::Ref))
    );
    assert!(sheet.get_cell(a("A1")).unwrap().unwrap().referenced_cells().is_empty());
}

#[test]
fn test_bounding_size_single_cell() {
    let mut sheet = Sheet::new();
    sheet.set_content(Address::new(5, 3), "x").unwrap();
    assert_eq!(sheet.bounding_size(), Size { rows: 6, cols: 4 });

    sheet.clear_cell(Address::new(5, 3)).unwrap();
    assert_eq!(sheet.bounding_size(), Size { rows: 0, cols: 0 });
}

#[test]
fn test_bounding_size_width_from_any_row() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "x").unwrap();
    sheet.set_content(a("E3"), "y").unwrap();
    sheet.set_content(a("A5"), "z").unwrap();
    assert_eq!(sheet.bounding_size(), Size { rows: 5, cols: 5 });

    sheet.clear_cell(a("A5")).unwrap();
    assert_eq!(sheet.bounding_size(), Size { rows: 3, cols: 5 });
}

#[test]
fn test_export_round_trip() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "2").unwrap();
    sheet.set_content(a("B1"), "=A1 * 3").unwrap();
    sheet.set_content(a("A3"), "'=literal").unwrap();

    assert_eq!(values(&sheet), "2\t6\n\t\n=literal\t\n");
    assert_eq!(texts(&sheet), "2\t=A1 * 3\n\t\n'=literal\t\n");
}

#[test]
fn test_export_empty_sheet() {
    let sheet = Sheet::new();
    assert_eq!(values(&sheet), "");
    assert_eq!(texts(&sheet), "");
}

#[test]
fn test_config_from_toml_drives_limits() {
    let config = SheetConfig::from_toml_str("[limits]\nrows = 2\ncols = 2\n").unwrap();
    let mut sheet = Sheet::with_config(config);
    assert!(sheet.parse_address("B2").is_ok());
    assert!(matches!(
        sheet.parse_address("C1"),
        Err(SheetError::InvalidAddress(_))
    ));
    assert!(matches!(
        sheet.set_content(Address::new(2, 0), "x"),
        Err(SheetError::InvalidAddress(_))
    ));
}

#[test]
fn test_range_functions_skip_gaps() {
    let mut sheet = Sheet::new();
    sheet.set_content(a("A1"), "1").unwrap();
    sheet.set_content(a("A3"), "3").unwrap();
    sheet.set_content(a("B1"), "=SUM(A1:A3)").unwrap();
    sheet.set_content(a("B2"), "=COUNT(A1:A3)").unwrap();
    assert_eq!(sheet.value(a("B1")).unwrap(), Some(Value::Number(4.0)));
    assert_eq!(sheet.value(a("B2")).unwrap(), Some(Value::Number(2.0)));

    sheet.set_content(a("A2"), "").unwrap();
    assert_eq!(sheet.value(a("B2")).unwrap(), Some(Value::Number(2.0)));

    sheet.set_content(a("A2"), "2").unwrap();
    assert_eq!(sheet.value(a("B1")).unwrap(), Some(Value::Number(6.0)));
    assert_eq!(sheet.value(a("B2")).unwrap(), Some(Value::Number(3.0)));

    sheet.set_content(a("B3"), "=A1 + A4").unwrap();
    assert_eq!(
        sheet.value(a("B3")).unwrap(),
        Some(Value::Error(FormulaError::Value))
    );
}

//! Integration tests for icg-ingest with a real spreadsheet export.
//!
//! The fixture is a sheet-to-array dump of a small install code workbook
//! with mixed cell types and the usual spreadsheet untidiness.

use icg_core::InstallCode;
use icg_ingest::{ingest, parse_grid_json};
use serde_json::json;

/// Path to the fixture relative to the workspace root
const FIXTURE_PATH: &str = "testing/fixtures/grids/flint_sample.json";

/// Get the absolute path to the fixture grid
fn fixture_path() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(FIXTURE_PATH)
}

fn load_fixture() -> icg_core::Grid {
    let text = std::fs::read_to_string(fixture_path()).unwrap();
    parse_grid_json(&text).unwrap()
}

// =============================================================================
// Fixture Workbook
// =============================================================================

#[test]
fn test_fixture_builds_in_header_order() {
    let dataset = ingest(&load_fixture()).unwrap();
    assert_eq!(dataset.builds, vec!["24.1.0", "24.2.0", "25.1.0"]);
}

#[test]
fn test_fixture_compatibility_flags() {
    let dataset = ingest(&load_fixture()).unwrap();
    let by_code = |code: &str| -> &InstallCode {
        dataset.install_codes.iter().find(|c| c.code == code).unwrap()
    };

    assert_eq!(by_code("ADDR1").compatible_builds, vec!["24.1.0", "24.2.0"]);
    assert_eq!(by_code("NET-03").compatible_builds, vec!["24.1.0", "25.1.0"]);
    assert_eq!(by_code("CAL").compatible_builds, vec!["24.1.0"]);
    assert_eq!(by_code("PKG-B").compatible_builds, vec!["25.1.0"]);
}

#[test]
fn test_fixture_skips_codeless_rows_and_keeps_order() {
    let dataset = ingest(&load_fixture()).unwrap();
    let codes: Vec<&str> = dataset.install_codes.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["ADDR1", "NET-03", "CAL", "PKG-A", "PKG-B", "LEGACY"]);
}

#[test]
fn test_fixture_addons() {
    let dataset = ingest(&load_fixture()).unwrap();
    assert_eq!(dataset.addons, vec!["PKG-A", "PKG-B"]);
    assert_eq!(dataset.addon_descriptions.len(), 2);
    assert_eq!(dataset.addon_descriptions["PKG-B"], "Fleet telemetry");

    // "Add-on" is not the add-on type label
    let legacy = dataset.install_codes.iter().find(|c| c.code == "LEGACY").unwrap();
    assert!(legacy.for_addon.is_none());
}

// =============================================================================
// Truthiness Contract
// =============================================================================

#[test]
fn test_every_build_column_marker() {
    let markers = json!(["FALSE", "0", "No", "no", "", null, "TRUE", "1", "x", "Yes", "anything"]);
    let count = markers.as_array().unwrap().len();

    let mut header = vec![json!("Code"), json!("Description"), json!("Type")];
    header.extend((0..count).map(|i| json!(format!("b{}", i))));

    let mut row = vec![json!("C"), json!("d"), json!("Required")];
    row.extend(markers.as_array().unwrap().iter().cloned());

    let grid: icg_core::Grid = serde_json::from_value(json!([header, row, ["D", "d", "Required"]])).unwrap();
    let dataset = ingest(&grid).unwrap();

    assert_eq!(
        dataset.install_codes[0].compatible_builds,
        vec!["b6", "b7", "b8", "b9", "b10"]
    );
}

// =============================================================================
// Format Errors
// =============================================================================

#[test]
fn test_format_errors() {
    let cases = [
        json!([]),
        json!([["Code", "Description", "Type", "1"]]),
        json!([["Code", "Description", "Type", "1"], ["A", "a", "Required", "X"]]),
        json!([["Code", "Desc", "Type", "1"], ["A"], ["B"]]),
        json!([["Code", "Description", "1", "2"], ["A"], ["B"]]),
        json!([["Code", "Description", "Type"], ["A"], ["B"]]),
        json!([["Code", "Description", "Type", "", null], ["A"], ["B"]]),
    ];

    for case in cases {
        let grid: icg_core::Grid = serde_json::from_value(case.clone()).unwrap();
        let err = ingest(&grid).unwrap_err();
        assert!(err.is_format(), "expected format error for {}", case);
    }
}

#[test]
fn test_header_only_plus_blank_rows_is_valid() {
    let grid: icg_core::Grid = serde_json::from_value(json!([["Code", "Description", "Type", "1"], [], []])).unwrap();
    let dataset = ingest(&grid).unwrap();
    assert_eq!(dataset.builds, vec!["1"]);
    assert!(dataset.install_codes.is_empty());
}

//! Scans the generated fixture through DuckDB.
//!
//! The spatial extension is downloaded on first use; tests that need it
//! print SKIP and return when it cannot be installed.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sheetbench_core::{control_expectations, split_first, RowReader, SheetSource, Value, Verdict};
use sheetbench_duckdb::{DuckDbOptions, DuckDbReader};
use sheetbench_xlsx::{FixtureWriter, FIXTURE_HEADERS};

fn fixture(dir: &Path) -> PathBuf {
    let path = dir.join("file.xlsx");
    FixtureWriter::new(4).write_file(&path).unwrap();
    path
}

fn spatial_available() -> bool {
    match DuckDbReader::sql().connect() {
        Ok(_) => true,
        Err(e) => {
            eprintln!("SKIP: spatial extension unavailable: {e}");
            false
        }
    }
}

#[test]
fn test_unknown_extension_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture(dir.path());

    let reader = DuckDbReader::execute().with_options(DuckDbOptions {
        extension: "sheetbench_no_such_extension".to_string(),
        install: false,
    });
    let err = reader
        .read(SheetSource::open(&input).unwrap())
        .err()
        .expect("loading a missing extension must fail");
    let msg = err.to_string();
    assert!(
        msg.starts_with("duckdb_execute: could not load extension 'sheetbench_no_such_extension'"),
        "{msg}"
    );
}

#[test]
fn test_typed_scan_keeps_headers_and_text() {
    if !spatial_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = fixture(dir.path());

    let rows = DuckDbReader::sql()
        .read(SheetSource::open(&input).unwrap())
        .unwrap();
    let (control, rest) = split_first(rows).unwrap();

    assert_eq!(rest, 4);
    assert_eq!(control.keys().collect::<Vec<_>>(), FIXTURE_HEADERS.to_vec());
    assert_eq!(control.get("number"), Some(&Value::Int(1)));
    assert_eq!(control.get("text"), Some(&Value::from("CONTROL ROW")));
}

#[test]
fn test_string_scan_yields_only_text() {
    if !spatial_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = fixture(dir.path());

    let rows = DuckDbReader::execute()
        .read(SheetSource::open(&input).unwrap())
        .unwrap();
    let (control, _) = split_first(rows).unwrap();

    assert!(control
        .iter()
        .all(|(_, v)| matches!(v, Value::String(_) | Value::Null)));
    let text = control_expectations().pop().unwrap();
    assert_eq!(text.check(&control), Verdict::Pass);
    assert!(matches!(
        control_expectations()[0].check(&control),
        Verdict::TypeMismatch { received: "str", .. }
    ));
}

#[test]
fn test_path_with_quote_scans_in_both_modes() {
    if !spatial_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("o'neil.xlsx");
    FixtureWriter::new(0).write_file(&input).unwrap();

    for reader in [DuckDbReader::sql(), DuckDbReader::execute()] {
        let rows = reader.read(SheetSource::open(&input).unwrap()).unwrap();
        let (control, rest) = split_first(rows).unwrap();
        assert_eq!(rest, 0, "{}", reader.name());
        assert_eq!(control.len(), FIXTURE_HEADERS.len());
    }
}

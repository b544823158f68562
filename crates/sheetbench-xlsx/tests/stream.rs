//! Streams fixtures written by `FixtureWriter` back through `XlsxStreamReader`.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sheetbench_core::{control_expectations, split_first, Row, RowReader, SheetSource, Value, Verdict};
use sheetbench_xlsx::{FixtureWriter, SheetRecords, XlsxStreamReader, FIXTURE_HEADERS};

fn write_fixture(dir: &tempfile::TempDir, filler_rows: usize) -> std::path::PathBuf {
    let path = dir.path().join("file.xlsx");
    FixtureWriter::new(filler_rows)
        .write_file(&path)
        .expect("write fixture");
    path
}

fn read_all(path: &std::path::Path) -> Vec<Row> {
    let source = SheetSource::open(path).expect("open fixture");
    XlsxStreamReader
        .read(source)
        .expect("start reading")
        .collect::<sheetbench_core::Result<_>>()
        .expect("drain rows")
}

#[test]
fn test_header_row_becomes_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, 5);

    let rows = read_all(&path);
    assert_eq!(rows.len(), 6);
    for row in &rows {
        assert_eq!(row.keys().collect::<Vec<_>>(), FIXTURE_HEADERS.to_vec());
    }
}

#[test]
fn test_control_row_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, 0);

    let rows = read_all(&path);
    let control = &rows[0];
    assert_eq!(control.get("number"), Some(&Value::Int(1)));
    assert_eq!(control.get("decimal"), Some(&Value::Float(1.1)));
    assert_eq!(
        control.get("date"),
        Some(&Value::DateTime(
            NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        ))
    );
    assert_eq!(control.get("boolean"), Some(&Value::Bool(true)));
    assert_eq!(control.get("text"), Some(&Value::from("CONTROL ROW")));

    // Streaming decode keeps the timestamp, so only the date check fails
    let verdicts: Vec<bool> = control_expectations()
        .iter()
        .map(|e| e.check(control).is_pass())
        .collect();
    assert_eq!(verdicts, vec![true, true, false, true, true]);
    assert!(matches!(
        control_expectations()[2].check(control),
        Verdict::TypeMismatch {
            expected: "date",
            received: "datetime"
        }
    ));
}

#[test]
fn test_filler_rows_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, 2);

    let rows = read_all(&path);
    assert_eq!(rows[1].get("number"), Some(&Value::Int(2)));
    assert_eq!(rows[1].get("decimal"), Some(&Value::Float(2.25)));
    assert_eq!(rows[1].get("boolean"), Some(&Value::Bool(false)));
    assert_eq!(rows[2].get("text"), Some(&Value::from("row 3")));
}

#[test]
fn test_second_pass_yields_same_control_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, 10);

    let first = split_first(XlsxStreamReader.read(SheetSource::open(&path).unwrap()).unwrap()).unwrap();
    let second = split_first(XlsxStreamReader.read(SheetSource::open(&path).unwrap()).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.1, 10);
}

#[test]
fn test_in_memory_records_include_header() {
    let mut buf = Cursor::new(Vec::new());
    FixtureWriter::new(1).write(&mut buf).unwrap();
    buf.set_position(0);

    let records: Vec<Vec<Value>> = SheetRecords::open(buf)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        FIXTURE_HEADERS.iter().map(|h| Value::from(*h)).collect::<Vec<_>>()
    );
}

#[test]
fn test_not_a_zip_fails_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.xlsx");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"number,decimal\n1,1.1\n")
        .unwrap();

    let err = XlsxStreamReader
        .read(SheetSource::open(&path).unwrap())
        .err()
        .expect("CSV bytes are not a workbook");
    assert!(err.to_string().starts_with("xlsx_stream: ZIP error"), "{err}");
}

//! Reads the generated benchmark fixture through calamine.

use pretty_assertions::assert_eq;
use sheetbench_calamine::CalamineReader;
use sheetbench_core::{control_expectations, split_first, RowReader, SheetSource, Value};
use sheetbench_xlsx::{FixtureWriter, XlsxStreamReader, FIXTURE_HEADERS};

fn fixture(filler_rows: usize) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.xlsx");
    FixtureWriter::new(filler_rows).write_file(&path).unwrap();
    (dir, path)
}

#[test]
fn test_control_row_passes_every_check() {
    let (_dir, path) = fixture(3);

    let rows = CalamineReader.read(SheetSource::open(&path).unwrap()).unwrap();
    let (control, rest) = split_first(rows).unwrap();

    assert_eq!(rest, 3);
    assert_eq!(control.keys().collect::<Vec<_>>(), FIXTURE_HEADERS.to_vec());
    for exp in control_expectations() {
        assert!(
            exp.check(&control).is_pass(),
            "{} -> {:?}",
            exp.column,
            exp.check(&control)
        );
    }
}

#[test]
fn test_every_row_has_the_same_keys() {
    let (_dir, path) = fixture(20);

    let rows = CalamineReader.read(SheetSource::open(&path).unwrap()).unwrap();
    for row in rows {
        let row = row.unwrap();
        assert_eq!(row.keys().collect::<Vec<_>>(), FIXTURE_HEADERS.to_vec());
        assert!(matches!(row.get("decimal"), Some(Value::Float(_))));
    }
}

#[test]
fn test_reading_twice_is_deterministic() {
    let (_dir, path) = fixture(5);

    let first = split_first(CalamineReader.read(SheetSource::open(&path).unwrap()).unwrap()).unwrap();
    let second = split_first(CalamineReader.read(SheetSource::open(&path).unwrap()).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_garbage_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.xlsx");
    std::fs::write(&path, b"definitely not a spreadsheet").unwrap();

    let result = CalamineReader.read(SheetSource::open(&path).unwrap());
    let err = result.err().expect("garbage must not decode");
    assert!(err.to_string().starts_with("calamine:"), "{err}");
}

#[test]
fn test_streaming_reader_agrees_on_untyped_columns() {
    let (_dir, path) = fixture(8);

    let read_with = |reader: &dyn RowReader| {
        reader
            .read(SheetSource::open(&path).unwrap())
            .unwrap()
            .collect::<sheetbench_core::Result<Vec<_>>>()
            .unwrap()
    };
    let calamine_rows = read_with(&CalamineReader);
    let stream_rows = read_with(&XlsxStreamReader);

    assert_eq!(calamine_rows.len(), stream_rows.len());
    for (a, b) in calamine_rows.iter().zip(&stream_rows) {
        for column in ["number", "decimal", "boolean", "text"] {
            assert_eq!(a.get(column), b.get(column), "{column}");
        }
    }
}

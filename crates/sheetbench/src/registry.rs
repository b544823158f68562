//! The ordered list of readers under test

use sheetbench_calamine::CalamineReader;
use sheetbench_core::RowReader;
use sheetbench_duckdb::DuckDbReader;
use sheetbench_libreoffice::{LibreOfficeConfig, LibreOfficeReader};
use sheetbench_xlsx::XlsxStreamReader;

use crate::bench::BenchError;

/// Reader names in run order
pub const READER_NAMES: [&str; 5] = [
    "xlsx_stream",
    "libreoffice",
    "duckdb",
    "duckdb_execute",
    "calamine",
];

/// Every reader, in run order
pub fn default_readers(libreoffice: LibreOfficeConfig) -> Vec<Box<dyn RowReader>> {
    vec![
        Box::new(XlsxStreamReader),
        Box::new(LibreOfficeReader::new(libreoffice)),
        Box::new(DuckDbReader::sql()),
        Box::new(DuckDbReader::execute()),
        Box::new(CalamineReader),
    ]
}

/// Keep only the readers named in `names`, preserving run order.
///
/// An empty `names` keeps everything. Unknown names are an error.
pub fn select_readers(
    readers: Vec<Box<dyn RowReader>>,
    names: &[String],
) -> Result<Vec<Box<dyn RowReader>>, BenchError> {
    if names.is_empty() {
        return Ok(readers);
    }
    if let Some(unknown) = names
        .iter()
        .find(|n| !readers.iter().any(|r| r.name() == n.as_str()))
    {
        return Err(BenchError::UnknownReader(unknown.clone()));
    }
    Ok(readers
        .into_iter()
        .filter(|r| names.iter().any(|n| n == r.name()))
        .collect())
}

//! The reader capability and the byte source it consumes

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::row::{header_names, Row};
use crate::value::Value;

/// A lazy, forward-only, single-pass sequence of rows
pub type RowIter = Box<dyn Iterator<Item = Result<Row>>>;

/// An opened spreadsheet file together with the path it was opened from.
///
/// Libraries that read from a stream use [`SheetSource::into_file`]; engines
/// and tools that only accept a path use [`SheetSource::path`].
#[derive(Debug)]
pub struct SheetSource {
    path: PathBuf,
    file: File,
}

impl SheetSource {
    /// Open a file in binary read mode
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { path, file })
    }

    /// Path the source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take ownership of the open file
    pub fn into_file(self) -> File {
        self.file
    }
}

/// One candidate library adapted to produce [`Row`]s.
///
/// Implementations must not emit the header row, and should defer as much
/// work as the library allows to iteration so that timing covers the whole
/// decode.
pub trait RowReader {
    /// Stable name used in reports and for selection on the command line
    fn name(&self) -> &'static str;

    /// Start reading `source`, returning the data rows
    fn read(&self, source: SheetSource) -> Result<RowIter>;
}

/// Turns a stream of raw records into rows keyed by the first record.
///
/// The first record is consumed as the header. With padding enabled, short
/// data records are extended with [`Value::Null`] up to the header width.
pub struct HeaderRows<I> {
    records: I,
    headers: Option<Vec<String>>,
    pad: bool,
}

impl<I> HeaderRows<I>
where
    I: Iterator<Item = Result<Vec<Value>>>,
{
    /// Rows keyed by the first record, zipped as-is
    pub fn new(records: I) -> Self {
        Self {
            records,
            headers: None,
            pad: false,
        }
    }

    /// Rows keyed by the first record, short records padded with nulls
    pub fn padded(records: I) -> Self {
        Self {
            pad: true,
            ..Self::new(records)
        }
    }

    /// Rows keyed by headers known up front; every record is data
    pub fn with_headers(headers: Vec<String>, records: I) -> Self {
        Self {
            records,
            headers: Some(headers),
            pad: false,
        }
    }
}

impl<I> Iterator for HeaderRows<I>
where
    I: Iterator<Item = Result<Vec<Value>>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.headers.is_none() {
            match self.records.next()? {
                Ok(cells) => self.headers = Some(header_names(cells)),
                Err(e) => return Some(Err(e)),
            }
        }
        let headers = self.headers.as_deref().unwrap_or_default();

        let mut values = match self.records.next()? {
            Ok(values) => values,
            Err(e) => return Some(Err(e)),
        };
        if self.pad && values.len() < headers.len() {
            values.resize(headers.len(), Value::Null);
        }
        Some(Ok(Row::zip(headers, values)))
    }
}

/// Box a record stream as a [`RowIter`], taking headers from the first record
pub fn rows_from_records<I>(records: I) -> RowIter
where
    I: Iterator<Item = Result<Vec<Value>>> + 'static,
{
    Box::new(HeaderRows::new(records))
}

/// Pull the first row and the number of rows after it.
///
/// An empty sequence is an error: there is no control row to check.
pub fn split_first(mut rows: RowIter) -> Result<(Row, usize)> {
    let first = rows.next().ok_or(Error::NoDataRows)??;
    let mut rest = 0usize;
    for row in rows {
        row?;
        rest += 1;
    }
    Ok((first, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(cells: &[&str]) -> Result<Vec<Value>> {
        Ok(cells.iter().map(|c| Value::from(*c)).collect())
    }

    #[test]
    fn test_header_record_is_not_emitted() {
        let records = vec![record(&["a", "b"]), record(&["1", "2"]), record(&["3", "4"])];
        let rows: Vec<Row> = HeaderRows::new(records.into_iter())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some(&Value::from("1")));
        assert_eq!(rows[1].get("b"), Some(&Value::from("4")));
    }

    #[test]
    fn test_padding_fills_short_records() {
        let records = vec![record(&["a", "b", "c"]), record(&["1"])];
        let row = HeaderRows::padded(records.into_iter())
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(row.get("c"), Some(&Value::Null));
    }

    #[test]
    fn test_header_only_source_is_empty() {
        let records = vec![record(&["a", "b"])];
        assert!(HeaderRows::new(records.into_iter()).next().is_none());
        let rows = rows_from_records(vec![record(&["a"])].into_iter());
        assert!(matches!(split_first(rows), Err(Error::NoDataRows)));
    }

    #[test]
    fn test_errors_pass_through() {
        let records = vec![
            record(&["a"]),
            Err(Error::reader("test", "broken record")),
            record(&["2"]),
        ];
        let mut rows = HeaderRows::new(records.into_iter());
        let err = rows.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "test: broken record");
    }

    #[test]
    fn test_split_first_counts_remaining_rows() {
        let records = vec![record(&["a"]), record(&["1"]), record(&["2"]), record(&["3"])];
        let (first, rest) = split_first(rows_from_records(records.into_iter())).unwrap();
        assert_eq!(first.get("a"), Some(&Value::from("1")));
        assert_eq!(rest, 2);
    }
}

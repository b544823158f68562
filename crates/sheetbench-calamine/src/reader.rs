//! calamine reader

use std::io::{Cursor, Read};
use std::time::Instant;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sheetbench_core::{narrow_datetime, rows_from_records, RowIter, RowReader, SheetSource, Value};

use crate::error::{CalamineError, CalamineResult};

/// Row reader over calamine's in-memory worksheet range.
///
/// Integral floats come back as integers and date-formatted cells as dates
/// (timestamps when they carry a time of day), matching how calamine's
/// Python bindings hand cells over.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineReader;

impl CalamineReader {
    /// Load the first worksheet of a workbook held in `bytes`
    pub fn first_range(bytes: Vec<u8>) -> CalamineResult<Range<Data>> {
        let start = Instant::now();
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(CalamineError::NoSheets)??;
        tracing::debug!(
            size = ?range.get_size(),
            elapsed = ?start.elapsed(),
            "loaded calamine range"
        );
        Ok(range)
    }
}

impl RowReader for CalamineReader {
    fn name(&self) -> &'static str {
        "calamine"
    }

    fn read(&self, source: SheetSource) -> sheetbench_core::Result<RowIter> {
        let mut bytes = Vec::new();
        source.into_file().read_to_end(&mut bytes)?;
        let range = Self::first_range(bytes)?;

        let (height, width) = range.get_size();
        let records = (0..height).map(move |row| {
            Ok((0..width)
                .map(|col| range.get((row, col)).map_or(Value::Null, convert))
                .collect())
        });
        Ok(rows_from_records(records))
    }
}

/// Convert one calamine cell into a [`Value`]
pub fn convert(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(n) => Value::Int(*n),
        Data::Float(f) => float_or_int(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                Value::Float(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map(narrow_datetime)
                    .unwrap_or(Value::Float(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso(s).unwrap_or_else(|| Value::String(s.clone())),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

/// Spreadsheets store every number as a double; whole numbers inside the
/// exactly representable range are handed back as integers.
fn float_or_int(f: f64) -> Value {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= LIMIT {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

fn parse_iso(s: &str) -> Option<Value> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(narrow_datetime(dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Value::Date(d));
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .ok()
        .map(|t| Value::String(t.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integral_floats_become_ints() {
        assert_eq!(convert(&Data::Float(1.0)), Value::Int(1));
        assert_eq!(convert(&Data::Float(-3.0)), Value::Int(-3));
        assert_eq!(convert(&Data::Float(1.1)), Value::Float(1.1));
        assert_eq!(convert(&Data::Float(1e300)), Value::Float(1e300));
    }

    #[test]
    fn test_scalar_cells() {
        assert_eq!(convert(&Data::Empty), Value::Null);
        assert_eq!(convert(&Data::Int(7)), Value::Int(7));
        assert_eq!(convert(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(
            convert(&Data::String("CONTROL ROW".into())),
            Value::from("CONTROL ROW")
        );
    }

    #[test]
    fn test_iso_cells() {
        assert_eq!(
            convert(&Data::DateTimeIso("2000-01-01".into())),
            Value::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert_eq!(
            convert(&Data::DateTimeIso("2000-01-01T00:00:00".into())),
            Value::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert!(matches!(
            convert(&Data::DateTimeIso("2000-01-01T08:15:00".into())),
            Value::DateTime(_)
        ));
        assert_eq!(
            convert(&Data::DurationIso("PT1H".into())),
            Value::from("PT1H")
        );
    }
}

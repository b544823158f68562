//! DuckDB readers

use std::path::Path;
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{params, Connection};
use rust_decimal::prelude::ToPrimitive;
use sheetbench_core::{HeaderRows, RowIter, RowReader, SheetSource, Value};

use crate::error::{tagged, DuckDbError, DuckDbResult};
use crate::query::{FieldTypes, PathBinding, ScanQuery};

/// Extension handling for each read
#[derive(Debug, Clone)]
pub struct DuckDbOptions {
    /// Extension providing `st_read`. Default: `spatial`.
    pub extension: String,
    /// Run `INSTALL` before `LOAD`. Default: true.
    pub install: bool,
}

impl Default for DuckDbOptions {
    fn default() -> Self {
        Self {
            extension: "spatial".to_string(),
            install: true,
        }
    }
}

/// Row reader over an in-memory DuckDB database
#[derive(Debug, Clone)]
pub struct DuckDbReader {
    name: &'static str,
    query: ScanQuery,
    options: DuckDbOptions,
}

/// Column names and raw engine values of a finished scan
type ScanResult = (Vec<String>, Vec<Vec<DuckValue>>);

impl DuckDbReader {
    /// `duckdb`: path inlined into the SQL, column types inferred
    pub fn sql() -> Self {
        Self {
            name: "duckdb",
            query: ScanQuery {
                field_types: FieldTypes::Auto,
                binding: PathBinding::Inline,
            },
            options: DuckDbOptions::default(),
        }
    }

    /// `duckdb_execute`: path bound as a parameter, every column text
    pub fn execute() -> Self {
        Self {
            name: "duckdb_execute",
            query: ScanQuery {
                field_types: FieldTypes::String,
                binding: PathBinding::Parameter,
            },
            options: DuckDbOptions::default(),
        }
    }

    /// Replace the extension options
    pub fn with_options(mut self, options: DuckDbOptions) -> Self {
        self.options = options;
        self
    }

    /// The scan this reader issues
    pub fn query(&self) -> ScanQuery {
        self.query
    }

    /// Open an in-memory database with the scan extension loaded
    pub fn connect(&self) -> DuckDbResult<Connection> {
        let conn = Connection::open_in_memory()?;
        let name = &self.options.extension;
        let extension_error = |source| DuckDbError::Extension {
            name: name.clone(),
            source,
        };

        let start = Instant::now();
        if self.options.install {
            conn.execute_batch(&format!("INSTALL {name};"))
                .map_err(extension_error)?;
        }
        conn.execute_batch(&format!("LOAD {name};"))
            .map_err(extension_error)?;
        tracing::debug!(extension = %name, elapsed = ?start.elapsed(), "extension loaded");

        Ok(conn)
    }

    /// Run the scan over `path`, returning column names and raw values.
    ///
    /// The cursor borrows its statement, which borrows the connection, so the
    /// result set is fetched here; conversion to [`Value`] happens lazily
    /// while the rows are iterated.
    pub fn scan(&self, path: &Path) -> DuckDbResult<ScanResult> {
        let path = path
            .to_str()
            .ok_or_else(|| DuckDbError::NonUtf8Path(path.display().to_string()))?;
        let conn = self.connect()?;

        let sql = self.query.sql(path);
        tracing::debug!(reader = self.name, %sql, "running scan");
        let mut stmt = conn.prepare(&sql)?;

        let mut rows = match self.query.binding {
            PathBinding::Inline => stmt.query([])?,
            PathBinding::Parameter => stmt.query(params![path])?,
        };
        let headers = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(headers.len());
            for i in 0..headers.len() {
                values.push(row.get::<_, DuckValue>(i)?);
            }
            records.push(values);
        }

        Ok((headers, records))
    }
}

impl RowReader for DuckDbReader {
    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, source: SheetSource) -> sheetbench_core::Result<RowIter> {
        let (headers, records) = self.scan(source.path()).map_err(tagged(self.name))?;
        let records = records
            .into_iter()
            .map(|record| Ok(record.into_iter().map(convert).collect()));
        Ok(Box::new(HeaderRows::with_headers(headers, records)))
    }
}

fn unix_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Convert one engine value into a [`Value`].
///
/// Every integer width maps to `Int` (values beyond i64 fall back to
/// `Float`), `FLOAT`/`DOUBLE`/`DECIMAL` to `Float`, `DATE` to `Date` and
/// `TIMESTAMP` to `DateTime`. Anything else is rendered as text.
pub fn convert(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(n) => Value::Int(n.into()),
        DuckValue::SmallInt(n) => Value::Int(n.into()),
        DuckValue::Int(n) => Value::Int(n.into()),
        DuckValue::BigInt(n) => Value::Int(n),
        DuckValue::HugeInt(n) => i64::try_from(n).map_or(Value::Float(n as f64), Value::Int),
        DuckValue::UTinyInt(n) => Value::Int(n.into()),
        DuckValue::USmallInt(n) => Value::Int(n.into()),
        DuckValue::UInt(n) => Value::Int(n.into()),
        DuckValue::UBigInt(n) => i64::try_from(n).map_or(Value::Float(n as f64), Value::Int),
        DuckValue::Float(f) => Value::Float(f.into()),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => d
            .to_f64()
            .map_or_else(|| Value::String(d.to_string()), Value::Float),
        DuckValue::Date32(days) => unix_epoch()
            .checked_add_signed(Duration::days(days.into()))
            .map_or(Value::Null, |dt| Value::Date(dt.date())),
        DuckValue::Timestamp(unit, n) => {
            let offset = match unit {
                TimeUnit::Second => n.checked_mul(1_000_000).map(Duration::microseconds),
                TimeUnit::Millisecond => n.checked_mul(1_000).map(Duration::microseconds),
                TimeUnit::Microsecond => Some(Duration::microseconds(n)),
                TimeUnit::Nanosecond => Some(Duration::nanoseconds(n)),
            };
            offset
                .and_then(|offset| unix_epoch().checked_add_signed(offset))
                .map_or(Value::Null, Value::DateTime)
        }
        DuckValue::Text(s) => Value::String(s),
        other => Value::String(format!("{other:?}")),
    }
}

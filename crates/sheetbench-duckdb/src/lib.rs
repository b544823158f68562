//! # sheetbench-duckdb
//!
//! Row readers that scan the spreadsheet with DuckDB's `spatial` extension
//! (`st_read`, backed by GDAL's XLSX driver).
//!
//! Two flavours are registered:
//! - [`DuckDbReader::sql`] inlines the path into the query and lets the
//!   driver infer column types (`FIELD_TYPES=AUTO`).
//! - [`DuckDbReader::execute`] binds the path as a parameter of a prepared
//!   statement and forces every column to text (`FIELD_TYPES=STRING`).
//!
//! Both install and load the extension on a fresh in-memory database for
//! every read, so the extension cost is part of the measured time.

mod error;
mod query;
mod reader;

pub use error::{DuckDbError, DuckDbResult};
pub use query::{FieldTypes, PathBinding, ScanQuery};
pub use reader::{convert, DuckDbOptions, DuckDbReader};

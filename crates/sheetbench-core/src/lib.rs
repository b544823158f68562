//! # sheetbench-core
//!
//! Shared types for the sheetbench harness:
//! - [`Value`] - a decoded cell (integer, float, date, timestamp, boolean, string, null)
//! - [`Row`] - an ordered column name -> value mapping
//! - [`RowReader`] - the one capability every candidate library is adapted to
//! - [`Expectation`] and [`Verdict`] - the typed control-row oracle
//!
//! ## Example
//!
//! ```rust
//! use sheetbench_core::{control_expectations, Row, Value, Verdict};
//!
//! let headers = vec!["number".to_string(), "text".to_string()];
//! let row = Row::zip(&headers, vec![Value::Float(1.0), Value::from("CONTROL ROW")]);
//!
//! let checks = control_expectations();
//! assert!(matches!(checks[0].check(&row), Verdict::TypeMismatch { .. }));
//! assert_eq!(checks[4].check(&row), Verdict::Pass);
//! ```

pub mod error;
pub mod expect;
pub mod reader;
pub mod row;
pub mod value;

pub use error::{Error, Result};
pub use expect::{control_expectations, Expectation, FieldCheck, Verdict};
pub use reader::{rows_from_records, split_first, HeaderRows, RowIter, RowReader, SheetSource};
pub use row::{header_names, Row};
pub use value::{date_to_serial, narrow_datetime, serial_to_datetime, Value};

/// Glyph printed for a field that decoded as expected
pub const PASS_GLYPH: &str = "\u{1f7e2}";

/// Glyph printed for a field that is missing or decoded wrongly
pub const FAIL_GLYPH: &str = "\u{1f534}";

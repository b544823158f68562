//! # sheetbench-xlsx
//!
//! Two halves of the SpreadsheetML story for sheetbench:
//!
//! - [`XlsxStreamReader`] pulls `<row>` elements one at a time with
//!   `quick-xml`, decoding cells the way a read-only streaming workbook does:
//!   integers stay integers, and every date-formatted number becomes a
//!   timestamp.
//! - [`FixtureWriter`] writes the benchmark fixture: the canonical header,
//!   the control row and any number of filler rows.

pub mod error;
pub mod fixture;
pub mod package;
pub mod stream;

pub use error::{XlsxError, XlsxResult};
pub use fixture::{FixtureRow, FixtureWriter, FIXTURE_HEADERS};
pub use stream::{SheetRecords, XlsxStreamReader};

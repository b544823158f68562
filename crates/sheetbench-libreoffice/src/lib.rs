//! Office-suite conversion reader for sheetbench.
//!
//! The spreadsheet is handed to an office suite running headless, which
//! converts it to CSV inside a private temporary directory. The CSV is then
//! read with the [`csv`] crate. CSV has no cell types, so every value comes
//! back as [`sheetbench_core::Value::String`].
//!
//! ```text
//! sheetbench driver
//!     └── LibreOfficeReader (this crate)
//!           └── libreoffice --headless --convert-to csv --outdir <tmp> <file>
//!                 └── <tmp>/<stem>.csv  ──csv──> rows
//! ```

pub mod convert;
pub mod error;

pub use convert::{LibreOfficeConfig, LibreOfficeReader};
pub use error::{LibreOfficeError, Result};

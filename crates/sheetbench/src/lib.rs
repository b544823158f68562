//! # sheetbench
//!
//! Times a fixed list of spreadsheet readers over the same file and checks
//! how faithfully each one decodes a known control row.
//!
//! Every reader is run in turn: open the file, time the full decode, then
//! compare the first data row against five typed expectations. A reader
//! that fails is reported and the run moves on.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetbench::{default_readers, Benchmark, LibreOfficeConfig};
//!
//! let bench = Benchmark::new("file.xlsx", default_readers(LibreOfficeConfig::default()));
//! let results = bench.run(&mut std::io::stdout()).unwrap();
//! for result in &results {
//!     println!("{}: {}", result.reader, result.all_passed());
//! }
//! ```

pub mod bench;
pub mod registry;

pub use bench::{BenchError, BenchOptions, BenchResult, Benchmark, Outcome};
pub use registry::{default_readers, select_readers, READER_NAMES};

// Re-export the reader capability and the adapters
pub use sheetbench_calamine::CalamineReader;
pub use sheetbench_core::{
    control_expectations, Expectation, FieldCheck, Row, RowIter, RowReader, SheetSource, Value,
    Verdict,
};
pub use sheetbench_duckdb::{DuckDbOptions, DuckDbReader};
pub use sheetbench_libreoffice::{LibreOfficeConfig, LibreOfficeReader};
pub use sheetbench_xlsx::{FixtureWriter, XlsxStreamReader, FIXTURE_HEADERS};

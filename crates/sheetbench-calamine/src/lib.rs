//! # sheetbench-calamine
//!
//! Row reader backed by [`calamine`]. The whole file is loaded into memory,
//! the format is sniffed (xlsx, xlsm, xlsb, xls, ods) and the first
//! worksheet's range is walked row by row.

mod error;
mod reader;

pub use error::{CalamineError, CalamineResult};
pub use reader::{convert, CalamineReader};

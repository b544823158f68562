//! calamine adapter error types

use thiserror::Error;

/// Result type for the calamine adapter
pub type CalamineResult<T> = std::result::Result<T, CalamineError>;

/// Errors raised while loading a workbook through calamine
#[derive(Debug, Error)]
pub enum CalamineError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by calamine itself
    #[error("calamine error: {0}")]
    Calamine(#[from] calamine::Error),

    /// The workbook has no worksheets
    #[error("Workbook has no worksheets")]
    NoSheets,
}

impl From<CalamineError> for sheetbench_core::Error {
    fn from(e: CalamineError) -> Self {
        sheetbench_core::Error::reader("calamine", e)
    }
}

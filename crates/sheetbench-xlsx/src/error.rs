//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while streaming or writing XLSX
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The workbook lists no worksheets
    #[error("Workbook has no worksheets")]
    NoSheets,

    /// Cell content that does not match its declared type
    #[error("Parse error in cell {cell}: {message}")]
    Cell { cell: String, message: String },
}

impl From<XlsxError> for sheetbench_core::Error {
    fn from(e: XlsxError) -> Self {
        sheetbench_core::Error::reader("xlsx_stream", e)
    }
}

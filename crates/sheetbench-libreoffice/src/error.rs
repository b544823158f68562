//! Error types for the conversion reader.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibreOfficeError {
    #[error("Office suite not found: '{0}' is not on PATH")]
    NotFound(String),

    #[error("Failed to spawn office suite: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Conversion exited with {0}")]
    ConversionFailed(ExitStatus),

    #[error("Conversion produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Input path has no file name: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LibreOfficeError>;

impl From<LibreOfficeError> for sheetbench_core::Error {
    fn from(e: LibreOfficeError) -> Self {
        sheetbench_core::Error::reader("libreoffice", e)
    }
}

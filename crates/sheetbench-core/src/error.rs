//! Error types for sheetbench-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a reader while opening, decoding or draining a sheet
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while opening the fixture
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source had a header row (or nothing at all) but no data rows
    #[error("no data rows after the header row")]
    NoDataRows,

    /// Error raised by one of the adapted libraries or tools
    #[error("{reader}: {source}")]
    Reader {
        reader: &'static str,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Wrap a library error, tagging it with the adapter that raised it
    pub fn reader<E>(reader: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Reader {
            reader,
            source: source.into(),
        }
    }
}

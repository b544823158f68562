//! DuckDB adapter error types

use thiserror::Error;

/// Result type for the DuckDB adapters
pub type DuckDbResult<T> = std::result::Result<T, DuckDbError>;

/// Errors raised while scanning a sheet through DuckDB
#[derive(Debug, Error)]
pub enum DuckDbError {
    /// Error from the database engine
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// The extension could not be installed or loaded
    #[error("could not load extension '{name}': {source}")]
    Extension {
        name: String,
        #[source]
        source: duckdb::Error,
    },

    /// The input path is not valid UTF-8 and cannot be passed to st_read
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

/// Wraps a [`DuckDbError`] with the name of the reader that raised it
pub(crate) fn tagged(reader: &'static str) -> impl Fn(DuckDbError) -> sheetbench_core::Error {
    move |e| sheetbench_core::Error::reader(reader, e)
}

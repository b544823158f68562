//! Headless conversion to CSV and row extraction.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use sheetbench_core::{HeaderRows, RowIter, RowReader, SheetSource, Value};
use tempfile::TempDir;

use crate::error::{LibreOfficeError, Result};

/// Configuration for the conversion reader.
#[derive(Debug, Clone)]
pub struct LibreOfficeConfig {
    /// Office-suite executable. Default: `libreoffice`, looked up on PATH.
    pub program: PathBuf,
    /// Extra arguments placed before the conversion flags.
    pub extra_args: Vec<OsString>,
    /// Prefix of the temporary output directory.
    pub temp_prefix: String,
}

impl Default for LibreOfficeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("libreoffice"),
            extra_args: Vec::new(),
            temp_prefix: "excelbenchmark".to_string(),
        }
    }
}

/// Row reader that converts the workbook to CSV with an office suite.
#[derive(Debug, Clone, Default)]
pub struct LibreOfficeReader {
    config: LibreOfficeConfig,
}

impl LibreOfficeReader {
    pub fn new(config: LibreOfficeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LibreOfficeConfig {
        &self.config
    }

    /// Convert `input` into a CSV file inside a fresh temporary directory.
    ///
    /// The directory is returned alongside the CSV path; dropping it removes
    /// the converted file.
    pub fn convert(&self, input: &Path) -> Result<(TempDir, PathBuf)> {
        let stem = input
            .file_stem()
            .ok_or_else(|| LibreOfficeError::InvalidInput(input.to_path_buf()))?;

        let outdir = tempfile::Builder::new()
            .prefix(&self.config.temp_prefix)
            .tempdir()?;

        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.extra_args)
            .arg("--headless")
            .arg("--convert-to")
            .arg("csv")
            .arg("--outdir")
            .arg(outdir.path())
            .arg(input)
            .stdin(Stdio::null());

        tracing::info!("Starting conversion: {:?}", cmd);
        let start = Instant::now();
        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LibreOfficeError::NotFound(self.config.program.display().to_string())
            } else {
                LibreOfficeError::SpawnFailed(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "conversion failed"
            );
            return Err(LibreOfficeError::ConversionFailed(output.status));
        }

        let mut csv_name = stem.to_os_string();
        csv_name.push(".csv");
        let csv_path = outdir.path().join(csv_name);
        if !csv_path.is_file() {
            return Err(LibreOfficeError::MissingOutput(csv_path));
        }

        tracing::debug!(
            csv = %csv_path.display(),
            elapsed = ?start.elapsed(),
            "conversion finished"
        );
        Ok((outdir, csv_path))
    }
}

impl RowReader for LibreOfficeReader {
    fn name(&self) -> &'static str {
        "libreoffice"
    }

    fn read(&self, source: SheetSource) -> sheetbench_core::Result<RowIter> {
        let input = source.path().to_path_buf();
        drop(source);

        let (outdir, csv_path) = self.convert(&input)?;
        let records = ConvertedRecords::open(outdir, &csv_path)?;
        Ok(Box::new(HeaderRows::new(records)))
    }
}

/// CSV records read from the converted file.
///
/// Owns the temporary directory so that it outlives iteration and is removed
/// as soon as the rows are dropped.
struct ConvertedRecords {
    records: csv::StringRecordsIntoIter<File>,
    outdir: Option<TempDir>,
}

impl ConvertedRecords {
    fn open(outdir: TempDir, csv_path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(csv_path)?;
        Ok(Self {
            records: reader.into_records(),
            outdir: Some(outdir),
        })
    }
}

impl Iterator for ConvertedRecords {
    type Item = sheetbench_core::Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| r.iter().map(Value::from).collect())
                .map_err(|e| LibreOfficeError::Csv(e).into()),
        )
    }
}

impl Drop for ConvertedRecords {
    fn drop(&mut self) {
        if let Some(dir) = self.outdir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

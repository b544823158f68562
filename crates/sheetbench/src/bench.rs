//! Benchmark driver and report rendering

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sheetbench_core::{control_expectations, split_first, FieldCheck, Row, RowReader, SheetSource};
use thiserror::Error;

use crate::registry::select_readers;

/// Errors raised while setting up a run
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("unknown reader '{0}'")]
    UnknownReader(String),

    #[error("repeat count must be at least 1")]
    ZeroRepeat,
}

/// Run options
#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Reader names to run; empty runs all of them
    pub readers: Vec<String>,
    /// Passes per reader. Default: 1.
    pub repeat: usize,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            readers: Vec::new(),
            repeat: 1,
        }
    }
}

/// What happened when one reader ran
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Opening, reading, or draining raised; the message is the error text
    Failed(String),
    /// All rows were decoded and the control row was checked
    Completed {
        elapsed: Duration,
        control: Row,
        checks: Vec<FieldCheck>,
    },
}

/// One reader's section of the report
#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    pub reader: &'static str,
    pub outcome: Outcome,
}

impl BenchResult {
    /// Check if the reader finished and every field check passed
    pub fn all_passed(&self) -> bool {
        match &self.outcome {
            Outcome::Failed(_) => false,
            Outcome::Completed { checks, .. } => checks.iter().all(|c| c.verdict.is_pass()),
        }
    }
}

impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.reader)?;
        match &self.outcome {
            Outcome::Failed(message) => write!(f, "failed {message}"),
            Outcome::Completed {
                elapsed,
                control,
                checks,
            } => {
                writeln!(f, "elapsed {:.2}", elapsed.as_secs_f64())?;
                write!(f, "{control}")?;
                for check in checks {
                    write!(f, "\n{check}")?;
                }
                Ok(())
            }
        }
    }
}

/// Sequential benchmark over one spreadsheet file
pub struct Benchmark {
    path: PathBuf,
    readers: Vec<Box<dyn RowReader>>,
    repeat: usize,
}

impl Benchmark {
    /// Run every reader in `readers` once, in order
    pub fn new<P: AsRef<Path>>(path: P, readers: Vec<Box<dyn RowReader>>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            readers,
            repeat: 1,
        }
    }

    /// Filter `readers` and set the repeat count from `options`
    pub fn with_options<P: AsRef<Path>>(
        path: P,
        readers: Vec<Box<dyn RowReader>>,
        options: &BenchOptions,
    ) -> Result<Self, BenchError> {
        if options.repeat == 0 {
            return Err(BenchError::ZeroRepeat);
        }
        let readers = select_readers(readers, &options.readers)?;
        Ok(Self {
            repeat: options.repeat,
            ..Self::new(path, readers)
        })
    }

    /// Input file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the readers that will run, in order
    pub fn reader_names(&self) -> Vec<&'static str> {
        self.readers.iter().map(|r| r.name()).collect()
    }

    /// Run every reader and write each section to `out` as soon as it ends.
    ///
    /// Reader failures are part of the report; only a failed write to `out`
    /// stops the run.
    pub fn run<W: Write>(&self, out: &mut W) -> io::Result<Vec<BenchResult>> {
        let mut results = Vec::with_capacity(self.readers.len() * self.repeat);
        for reader in &self.readers {
            for _ in 0..self.repeat {
                let result = self.run_reader(reader.as_ref());
                writeln!(out)?;
                writeln!(out, "{result}")?;
                out.flush()?;
                results.push(result);
            }
        }
        Ok(results)
    }

    /// Time one full pass of `reader` and check its control row
    pub fn run_reader(&self, reader: &dyn RowReader) -> BenchResult {
        let name = reader.name();
        let _span = tracing::info_span!("reader", name).entered();

        let source = match SheetSource::open(&self.path) {
            Ok(source) => source,
            Err(e) => return failed(name, e),
        };

        let start = Instant::now();
        let drained = reader.read(source).and_then(split_first);
        let elapsed = start.elapsed();

        match drained {
            Ok((control, rest)) => {
                tracing::debug!(rows = rest + 1, ?elapsed, "drained");
                let checks = control_expectations()
                    .iter()
                    .map(|e| e.field_check(&control))
                    .collect();
                BenchResult {
                    reader: name,
                    outcome: Outcome::Completed {
                        elapsed,
                        control,
                        checks,
                    },
                }
            }
            Err(e) => failed(name, e),
        }
    }
}

fn failed(reader: &'static str, error: impl fmt::Display) -> BenchResult {
    tracing::warn!(%error, "reader failed");
    BenchResult {
        reader,
        outcome: Outcome::Failed(error.to_string()),
    }
}

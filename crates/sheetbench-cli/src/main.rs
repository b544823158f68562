//! sheetbench CLI - times spreadsheet readers and checks their decoded types

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use sheetbench::{
    default_readers, BenchOptions, Benchmark, FixtureWriter, LibreOfficeConfig, READER_NAMES,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetbench")]
#[command(
    author,
    version,
    about = "Benchmark spreadsheet readers and check the types they decode",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the readers over a spreadsheet and print the report (default)
    Run(RunArgs),

    /// List reader names in run order
    List,

    /// Write a benchmark fixture workbook
    Generate {
        /// Output path
        #[arg(default_value = "file.xlsx")]
        path: PathBuf,

        /// Filler rows written after the control row
        #[arg(short, long, default_value = "10000")]
        rows: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Spreadsheet to read
    #[arg(default_value = "file.xlsx")]
    path: PathBuf,

    /// Run only this reader (repeatable)
    #[arg(short, long = "reader", value_parser = PossibleValuesParser::new(READER_NAMES))]
    readers: Vec<String>,

    /// Passes per reader
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    repeat: u64,

    /// Office-suite executable used for CSV conversion
    #[arg(long, default_value = "libreoffice")]
    soffice: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => run(args),
        Some(Commands::List) => list_readers(),
        Some(Commands::Generate { path, rows }) => generate(&path, rows),
        None => run(cli.run),
    }
}

/// Logs go to stderr so stdout carries only the report
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(args: RunArgs) -> Result<()> {
    let libreoffice = LibreOfficeConfig {
        program: args.soffice,
        ..Default::default()
    };
    let options = BenchOptions {
        readers: args.readers,
        repeat: usize::try_from(args.repeat).context("Repeat count too large")?,
    };
    let bench = Benchmark::with_options(&args.path, default_readers(libreoffice), &options)?;

    tracing::info!(
        path = %bench.path().display(),
        readers = ?bench.reader_names(),
        "starting benchmark"
    );
    let stdout = io::stdout();
    let results = bench
        .run(&mut stdout.lock())
        .context("Failed to write report to stdout")?;

    let passed = results.iter().filter(|r| r.all_passed()).count();
    tracing::info!(passed, total = results.len(), "benchmark finished");
    Ok(())
}

fn list_readers() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in READER_NAMES {
        writeln!(stdout, "{name}").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn generate(path: &Path, rows: usize) -> Result<()> {
    let writer = FixtureWriter::new(rows);
    writer
        .write_file(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    eprintln!(
        "Wrote {} data rows to '{}'",
        writer.data_rows(),
        path.display()
    );
    Ok(())
}

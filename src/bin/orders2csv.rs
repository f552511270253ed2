use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use orders_ocr::{
    ExtractionReport, OutputFormat, OutputLayout, ParseOptions, QualityMode, WriteOptions,
    extract_orders, write_summary,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "orders2csv",
    version,
    about = "Turn purchase-order PDFs into order line records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract order lines from one or more documents into a single file.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF, or text dump with form-feed separated pages. Repeatable.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Output path. Defaults to processed_orders_<timestamp>.<format>.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: csv or json.
    #[arg(long, default_value = "csv")]
    format: String,

    /// Column layout: records (as parsed) or report (spreadsheet columns).
    #[arg(long, default_value = "records")]
    layout: String,

    /// Also write per-order totals to this CSV file.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Handling of table lines without an item number: strict, best-effort or skip.
    #[arg(long, default_value = "strict")]
    quality: String,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn default_output_path(format: OutputFormat) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!(
        "processed_orders_{timestamp}.{}",
        format.extension()
    ))
}

fn parse_options(args: &ExtractArgs) -> Result<(ParseOptions, WriteOptions)> {
    let quality_mode = QualityMode::from_str(&args.quality)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --quality")?;
    let format = OutputFormat::from_str(&args.format)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --format")?;
    let layout = OutputLayout::from_str(&args.layout)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --layout")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let parse = ParseOptions {
        quality_mode,
        ..ParseOptions::default()
    };
    let write = WriteOptions {
        format,
        layout,
        delimiter: args.delimiter as u8,
    };
    Ok((parse, write))
}

fn log_report(report: &ExtractionReport, output: &Path, verbose: bool) {
    eprintln!(
        "{} row(s) from {} document(s) written to {}",
        report.row_count,
        report.document_count,
        output.display()
    );

    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} row={:?}: {}",
                warning.code, warning.page, warning.row, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let (parse, write) = parse_options(args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(write.format));

    let report = extract_orders(&args.inputs, &output, &parse, &write)
        .with_context(|| format!("failed to extract orders into '{}'", output.display()))?;

    if let Some(summary) = &args.summary {
        write_summary(summary, &report.totals, write.delimiter)
            .with_context(|| format!("failed to write summary '{}'", summary.display()))?;
    }

    log_report(&report, &output, args.verbose);
    Ok(report)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orders_ocr=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                if report.row_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}

//! rusty-cutter CLI - split worksheets into chunked files and assemble tables
//! into workbooks.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use rusty_cutter::cutter::{self, DEFAULT_ROWS_PER_FILE, DEFAULT_START_CELL, MAX_ROWS_PER_SHEET};
use rusty_cutter::{AssembleRequest, CutterError, OutputFormat, Range, SplitRequest};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "rusty-cutter",
    version,
    about = "Split worksheets into smaller files and assemble tables into workbooks"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the worksheet names of a workbook
    Sheets {
        /// Workbook path (.xlsx, .xlsm, .xlam, .ods)
        workbook: PathBuf,
    },

    /// Split a range of one worksheet into files of at most N data rows
    Split {
        /// Workbook path (.xlsx, .xlsm, .xlam, .ods)
        workbook: PathBuf,

        /// Worksheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Top-left cell of the range; its row holds the column names
        #[arg(long, default_value = DEFAULT_START_CELL)]
        start: String,

        /// Bottom-right cell of the range (default: last populated cell)
        #[arg(long)]
        end: Option<String>,

        /// Data rows per output file
        #[arg(short, long, default_value_t = DEFAULT_ROWS_PER_FILE, allow_negative_numbers = true)]
        rows: i64,

        /// Output directory (default: the workbook's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output formats, comma separated: xlsx, csv, json, ods
        #[arg(short, long = "format", value_delimiter = ',', default_value = "xlsx")]
        formats: Vec<OutputFormat>,
    },

    /// Assemble a CSV or JSON table into one workbook, one sheet per chunk
    Assemble {
        /// Table path (.csv or .json)
        table: PathBuf,

        /// Workbook to create (default: the table path with .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data rows per sheet, capped at the worksheet limit
        #[arg(short, long, default_value_t = MAX_ROWS_PER_SHEET, allow_negative_numbers = true)]
        rows_per_sheet: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let category = error
                .downcast_ref::<CutterError>()
                .map_or("Error", CutterError::category);
            eprintln!("{category}: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Sheets { workbook } => {
            let names = rusty_cutter::source::list_sheets(&workbook).map_err(CutterError::from)?;
            for name in names {
                println!("{name}");
            }
        }
        Commands::Split {
            workbook,
            sheet,
            start,
            end,
            rows,
            output_dir,
            formats,
        } => {
            let sheet = match sheet {
                Some(sheet) => sheet,
                None => first_sheet(&workbook)?,
            };
            let range = Range::parse(&start, end.as_deref())?;
            let output_dir = output_dir.unwrap_or_else(|| parent_dir(&workbook));
            let request = SplitRequest::new(&workbook, sheet, &output_dir)
                .with_range(range)
                .with_rows_per_file(rows)
                .with_formats(formats);

            let report = cutter::split(&request)?;
            info!(
                "Split sheet '{}' of {} into {} file(s)",
                request.sheet,
                workbook.display(),
                report.files.len()
            );
            println!(
                "Created {} file(s) in {}.",
                report.chunks_written,
                output_dir.display()
            );
        }
        Commands::Assemble {
            table,
            output,
            rows_per_sheet,
        } => {
            let output = output.unwrap_or_else(|| table.with_extension("xlsx"));
            let request = AssembleRequest::new(&table, output).with_rows_per_sheet(rows_per_sheet);

            let report = cutter::assemble(&request)?;
            info!("Assembled {} into {}", table.display(), report.output.display());
            println!(
                "Created workbook with {} sheet(s) at {}.",
                report.sheets_written,
                report.output.display()
            );
        }
    }
    Ok(())
}

fn first_sheet(workbook: &Path) -> Result<String> {
    let names = rusty_cutter::source::list_sheets(workbook)
        .map_err(CutterError::from)
        .with_context(|| format!("Failed to list the sheets of {}", workbook.display()))?;
    names.into_iter().next().ok_or_else(|| {
        CutterError::EmptyResult(format!("{} contains no worksheets", workbook.display())).into()
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

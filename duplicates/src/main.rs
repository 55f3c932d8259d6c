//! Report repeated values in one column of a spreadsheet.
//!
//! Meant for catching reused team passwords in an exported roster. The report has an
//! annotated copy of every row, the duplicated rows alone, and the raw counts.

#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use forge_common::JOBS_VERSION;
use forge_common::duplicates::{DEFAULT_COLUMN, find_duplicates};
use forge_common::sheet::{read_sheet, write_workbook};
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Spreadsheet to check
    #[arg(short, long, default_value = "pass.xlsx", env = "FORGE_DUP_INPUT")]
    input: PathBuf,

    /// Sheet to read, defaults to the first one
    #[arg(long, env = "FORGE_DUP_SHEET")]
    sheet: Option<String>,

    /// Column to check; the first column is used if it is missing
    #[arg(long, default_value = DEFAULT_COLUMN, env = "FORGE_DUP_COLUMN")]
    column: String,

    /// Report to write
    #[arg(short, long, default_value = "duplicates_report.xlsx", env = "FORGE_DUP_OUTPUT")]
    output: PathBuf,
}

fn run(cli: &Cli) -> Result<()> {
    let sheet = read_sheet(&cli.input, cli.sheet.as_deref())?;
    info!(
        "Read {} rows from sheet '{}' of {}.",
        sheet.rows.len(),
        sheet.name,
        cli.input.display()
    );

    let report = find_duplicates(&sheet, &cli.column)?;
    let duplicated = report.duplicated_values();
    if duplicated > 0 {
        warn!(
            "{duplicated} values appear more than once, across {} rows.",
            report.duplicates_only.rows.len()
        );
    } else {
        info!("Every value is unique.");
    }

    write_workbook(&cli.output, &report.sheets())?;
    info!("Report written to {}.", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    forge_common::load_dotenv();
    let cli = Cli::parse();
    info!("Duplicate check v{JOBS_VERSION} started.");

    if let Err(e) = run(&cli) {
        error!("Duplicate check failed: {e:#}");
        std::process::exit(1);
    }
}

//! Export the participant roster to a spreadsheet.
//!
//! Fetches every team from the registration server and writes one row per team lead
//! and per team member. Nothing is written if the server response is malformed.

#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use forge_common::JOBS_VERSION;
use forge_common::roster::{DEFAULT_OUTPUT, flatten_roster, roster_sheet};
use forge_common::roster_api::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_ROSTER_URL, get_roster_from_server,
};
use forge_common::sheet::write_workbook;
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Roster endpoint on the registration server
    #[arg(long, default_value = DEFAULT_ROSTER_URL, env = "FORGE_ROSTER_URL")]
    url: String,

    /// Spreadsheet to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "FORGE_ROSTER_OUTPUT")]
    output: PathBuf,

    /// Give up on the request after this many seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "FORGE_HTTP_TIMEOUT_SECS")]
    timeout: u64,
}

fn run(cli: &Cli) -> Result<()> {
    let teams = get_roster_from_server(&cli.url, cli.timeout)?;
    info!("Fetched {} teams from {}.", teams.len(), cli.url);
    if teams.is_empty() {
        warn!("The roster is empty, writing an empty spreadsheet.");
    }

    let records = flatten_roster(&teams);
    let sheet = roster_sheet(&records);
    write_workbook(&cli.output, &[&sheet])?;
    info!(
        "Wrote {} participant rows to {}.",
        records.len(),
        cli.output.display()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    forge_common::load_dotenv();
    let cli = Cli::parse();
    info!("Roster export v{JOBS_VERSION} started.");

    if let Err(e) = run(&cli) {
        error!("Roster export failed, no file was written: {e:#}");
        std::process::exit(1);
    }
}

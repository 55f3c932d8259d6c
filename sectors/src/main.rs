//! Randomly deal verified teams into sectors.
//!
//! Every run overwrites the sector of every verified team.

#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use forge_common::db_util::{PgStore, StoreArgs};
use forge_common::store::run_sector_assignment;
use forge_common::{DEFAULT_SECTOR_QUOTA, JOBS_VERSION, SectorQuota};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Sectors to fill, in order. Each entry is `name` or `name:quota`
    #[arg(long, default_value = "Naruto,Sasuke,Itachi", env = "FORGE_SECTORS")]
    sectors: String,

    /// Quota for sectors listed without one
    #[arg(long, default_value_t = DEFAULT_SECTOR_QUOTA, env = "FORGE_SECTOR_QUOTA")]
    quota: u32,

    /// Compute and log the assignment without saving it
    #[arg(long, env = "FORGE_DRY_RUN")]
    dry_run: bool,
}

fn run(cli: &Cli, sectors: &[SectorQuota]) -> Result<()> {
    let mut store = PgStore::connect(&cli.store)?;
    run_sector_assignment(&mut store, sectors, &mut rand::rng(), cli.dry_run)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    forge_common::load_dotenv();
    let cli = Cli::parse();

    let sectors = match SectorQuota::parse_list(&cli.sectors, cli.quota) {
        Ok(sectors) => sectors,
        Err(e) => {
            error!("Invalid sector configuration: {e:#}");
            std::process::exit(2);
        }
    };
    info!(
        "Sector assignment v{JOBS_VERSION} started with sectors {}.",
        sectors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Err(e) = run(&cli, &sectors) {
        error!("Sector assignment failed: {e:#}");
        std::process::exit(1);
    }
}

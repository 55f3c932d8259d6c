//! Randomly draw judging domains for teams that do not have one yet.
//!
//! Each domain can be drawn at most as many times as it has slots.

#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use forge_common::JOBS_VERSION;
use forge_common::db_util::{PgStore, StoreArgs};
use forge_common::store::run_domain_assignment;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Compute and log the assignment without saving it
    #[arg(long, env = "FORGE_DRY_RUN")]
    dry_run: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let mut store = PgStore::connect(&cli.store)?;
    run_domain_assignment(&mut store, &mut rand::rng(), cli.dry_run)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    forge_common::load_dotenv();
    let cli = Cli::parse();
    info!("Domain assignment v{JOBS_VERSION} started.");

    if let Err(e) = run(&cli) {
        error!("Domain assignment failed: {e:#}");
        std::process::exit(1);
    }
}

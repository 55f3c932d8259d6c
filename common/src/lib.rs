//! A library with common utilities for running hackathon operations jobs.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod domain_assignment;
pub mod duplicates;
pub mod plan;
pub mod roster;
pub mod roster_api;
pub mod sector_assignment;
pub mod sheet;
pub mod store;

#[cfg(feature = "database")]
pub mod db_util;

use anyhow::{Result, anyhow};
use std::fmt;

pub const JOBS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sectors used when none are configured, in the order they are dealt.
pub const DEFAULT_SECTORS: [&str; 3] = ["Naruto", "Sasuke", "Itachi"];

/// Maximum number of teams in a sector unless configured otherwise.
pub const DEFAULT_SECTOR_QUOTA: u32 = 20;

/// A team as seen by the assignment jobs.
/// Scoring and review columns are owned by the registration system and never loaded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team_id: u32,
    pub teamname: String,
    pub verified: bool,
    pub sector: Option<String>,
    pub domain: Option<String>,
}

impl TeamRecord {
    /// A team is waiting on a domain if it has none or an empty one.
    #[must_use]
    pub fn needs_domain(&self) -> bool {
        self.domain.as_deref().is_none_or(str::is_empty)
    }
}

/// A judging domain and how many teams it can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub domain_id: u32,
    pub name: String,
    pub slots: u32,
}

/// A sector name with its maximum occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorQuota {
    pub name: String,
    pub quota: u32,
}

impl SectorQuota {
    #[must_use]
    pub fn new(name: &str, quota: u32) -> Self {
        Self {
            name: name.to_string(),
            quota,
        }
    }

    /// Parse a comma-separated sector list.
    /// Each entry is either `name` (uses `default_quota`) or `name:quota`.
    ///
    /// # Errors
    /// Returns an error if an entry is blank, a quota is not a number, or a name repeats.
    pub fn parse_list(input: &str, default_quota: u32) -> Result<Vec<SectorQuota>> {
        let mut sectors: Vec<SectorQuota> = Vec::new();
        for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let sector = match entry.split_once(':') {
                Some((name, quota)) => {
                    let quota = quota
                        .trim()
                        .parse::<u32>()
                        .map_err(|e| anyhow!("Invalid quota for sector '{name}': {e}"))?;
                    SectorQuota::new(name.trim(), quota)
                }
                None => SectorQuota::new(entry, default_quota),
            };
            if sector.name.is_empty() {
                return Err(anyhow!("Sector entry '{entry}' has no name"));
            }
            if sectors.iter().any(|s| s.name == sector.name) {
                return Err(anyhow!("Sector '{}' is listed more than once", sector.name));
            }
            sectors.push(sector);
        }
        Ok(sectors)
    }

    /// The default three sectors, all with the same quota.
    #[must_use]
    pub fn defaults(quota: u32) -> Vec<SectorQuota> {
        DEFAULT_SECTORS
            .iter()
            .map(|name| SectorQuota::new(name, quota))
            .collect()
    }
}

/// Load variables from a `.env` file if there is one.
/// Call before parsing the command line so `env` defaults pick them up.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        log::info!("Loaded environment from {}", path.display());
    }
}

impl fmt::Display for SectorQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.quota)
    }
}

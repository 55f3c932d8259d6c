//! The team store seam and the two assignment jobs built on top of it.

use crate::domain_assignment::plan_domains;
use crate::plan::{AssignmentOutcome, Placement};
use crate::sector_assignment::plan_sectors;
use crate::{DomainRecord, SectorQuota, TeamRecord};
use anyhow::{Result, anyhow};
use log::info;
use rand::Rng;

/// Reads and writes the two fields the assignment jobs own.
pub trait TeamStore {
    /// All teams flagged as verified.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    fn verified_teams(&mut self) -> Result<Vec<TeamRecord>>;

    /// All teams whose domain is missing or empty.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    fn teams_without_domain(&mut self) -> Result<Vec<TeamRecord>>;

    /// All domain definitions.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    fn all_domains(&mut self) -> Result<Vec<DomainRecord>>;

    /// Set each placed team's sector. Either every write lands or none do.
    ///
    /// # Errors
    /// Returns an error if any write fails.
    fn write_sectors(&mut self, placements: &[Placement]) -> Result<usize>;

    /// Set each placed team's domain. Either every write lands or none do.
    ///
    /// # Errors
    /// Returns an error if any write fails.
    fn write_domains(&mut self, placements: &[Placement]) -> Result<usize>;
}

/// Plan sectors for every verified team, report the plan, and write it unless `dry_run`.
///
/// # Errors
/// Returns an error if the store cannot be read or the writes fail.
pub fn run_sector_assignment<S: TeamStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    sectors: &[SectorQuota],
    rng: &mut R,
    dry_run: bool,
) -> Result<AssignmentOutcome> {
    let teams = store.verified_teams()?;
    info!("Found {} verified teams to assign.", teams.len());

    let outcome = plan_sectors(&teams, sectors, rng);
    outcome.report("sector");
    apply(&outcome, dry_run, |p| store.write_sectors(p))?;
    Ok(outcome)
}

/// Plan domains for every team without one, report the plan, and write it unless `dry_run`.
///
/// # Errors
/// Returns an error if the store cannot be read or the writes fail.
pub fn run_domain_assignment<S: TeamStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    rng: &mut R,
    dry_run: bool,
) -> Result<AssignmentOutcome> {
    let teams = store.teams_without_domain()?;
    info!("Found {} teams to assign a domain.", teams.len());

    // no point loading domains if nobody needs one
    let domains = if teams.is_empty() {
        Vec::new()
    } else {
        let domains = store.all_domains()?;
        let total_slots: u64 = domains.iter().map(|d| u64::from(d.slots)).sum();
        info!(
            "Loaded {} domains with {total_slots} total slots.",
            domains.len()
        );
        domains
    };

    let outcome = plan_domains(&teams, &domains, rng);
    outcome.report("domain");
    apply(&outcome, dry_run, |p| store.write_domains(p))?;
    Ok(outcome)
}

fn apply<F>(outcome: &AssignmentOutcome, dry_run: bool, write: F) -> Result<()>
where
    F: FnOnce(&[Placement]) -> Result<usize>,
{
    let placements = outcome.placements();
    if placements.is_empty() {
        return Ok(());
    }
    if dry_run {
        info!("Dry run: skipped writing {} assignments.", placements.len());
        return Ok(());
    }
    let written = write(placements)?;
    if written != placements.len() {
        return Err(anyhow!(
            "Expected to update {} teams but {written} rows changed",
            placements.len()
        ));
    }
    info!("Saved {written} assignments.");
    Ok(())
}

/// A store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub teams: Vec<TeamRecord>,
    pub domains: Vec<DomainRecord>,
    pub writes: usize,
    pub domain_loads: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new(teams: Vec<TeamRecord>, domains: Vec<DomainRecord>) -> Self {
        Self {
            teams,
            domains,
            writes: 0,
            domain_loads: 0,
        }
    }

    #[must_use]
    pub fn team(&self, team_id: u32) -> Option<&TeamRecord> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    fn write_field<F>(&mut self, placements: &[Placement], set: F) -> Result<usize>
    where
        F: Fn(&mut TeamRecord, String),
    {
        // check everything first so a bad id leaves the store untouched
        if let Some(missing) = placements.iter().find(|p| self.team(p.team_id).is_none()) {
            return Err(anyhow!("Team #{} does not exist", missing.team_id));
        }
        for placement in placements {
            if let Some(team) = self.teams.iter_mut().find(|t| t.team_id == placement.team_id) {
                set(team, placement.value.clone());
                self.writes += 1;
            }
        }
        Ok(placements.len())
    }
}

impl TeamStore for MemoryStore {
    fn verified_teams(&mut self) -> Result<Vec<TeamRecord>> {
        Ok(self.teams.iter().filter(|t| t.verified).cloned().collect())
    }

    fn teams_without_domain(&mut self) -> Result<Vec<TeamRecord>> {
        Ok(self
            .teams
            .iter()
            .filter(|t| t.needs_domain())
            .cloned()
            .collect())
    }

    fn all_domains(&mut self) -> Result<Vec<DomainRecord>> {
        self.domain_loads += 1;
        Ok(self.domains.clone())
    }

    fn write_sectors(&mut self, placements: &[Placement]) -> Result<usize> {
        self.write_field(placements, |team, value| team.sector = Some(value))
    }

    fn write_domains(&mut self, placements: &[Placement]) -> Result<usize> {
        self.write_field(placements, |team, value| team.domain = Some(value))
    }
}

//! Assignment plans shared by the sector and domain jobs.
//!
//! Planning is pure: it takes snapshots of the store and an RNG and returns an
//! [`AssignmentOutcome`]. Nothing is written until the plan is handed to a
//! [`crate::store::TeamStore`].

use crate::TeamRecord;
use log::{info, warn};

/// One team receiving one value (a sector or a domain name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub team_id: u32,
    pub teamname: String,
    pub value: String,
}

/// How full one sector or domain ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub name: String,
    pub assigned: u32,
    pub capacity: u32,
}

/// A computed assignment with at least one placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub placements: Vec<Placement>,
    pub unassigned: Vec<TeamRecord>,
    pub tallies: Vec<Tally>,
}

impl AssignmentPlan {
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.placements.len()
    }

    /// Some teams could not be placed because capacity ran out.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.unassigned.is_empty()
    }
}

/// Result of a planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// There were no eligible teams.
    NothingToDo,
    /// Teams exist but there is no capacity at all. Every team is listed.
    CannotProceed {
        reason: String,
        unassigned: Vec<TeamRecord>,
    },
    Planned(AssignmentPlan),
}

impl AssignmentOutcome {
    /// Placements that should be written, empty unless a plan was made.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        match self {
            AssignmentOutcome::Planned(plan) => &plan.placements,
            _ => &[],
        }
    }

    /// Log the outcome. `what` names the assigned thing, like "sector".
    pub fn report(&self, what: &str) {
        match self {
            AssignmentOutcome::NothingToDo => {
                info!("No teams need a {what} assignment. Nothing to do.");
            }
            AssignmentOutcome::CannotProceed { reason, unassigned } => {
                for team in unassigned {
                    warn!(
                        "Could not assign a {what} to team '{}': {reason}.",
                        team.teamname
                    );
                }
                warn!(
                    "Cannot proceed with {what} assignment: {reason}. {} teams left unassigned.",
                    unassigned.len()
                );
            }
            AssignmentOutcome::Planned(plan) => {
                for placement in &plan.placements {
                    info!(
                        "  -> Assigned {what} '{}' to team '{}'.",
                        placement.value, placement.teamname
                    );
                }
                for team in &plan.unassigned {
                    warn!(
                        "All {what} capacity is used up. Could not assign a {what} to team '{}'.",
                        team.teamname
                    );
                }
                info!("--- Assignment Summary ---");
                for tally in &plan.tallies {
                    info!(
                        "  - {}: {}/{} teams",
                        tally.name, tally.assigned, tally.capacity
                    );
                }
                if plan.is_partial() {
                    warn!(
                        "Partial {what} assignment: {} teams assigned, {} left unassigned.",
                        plan.assigned_count(),
                        plan.unassigned.len()
                    );
                } else {
                    info!(
                        "Assigned a {what} to all {} teams.",
                        plan.assigned_count()
                    );
                }
            }
        }
    }
}

//! Draw judging domains for teams from a pool of slots.

use crate::plan::{AssignmentOutcome, AssignmentPlan, Placement, Tally};
use crate::{DomainRecord, TeamRecord};
use rand::Rng;
use rand::seq::SliceRandom;

/// Expand every domain into one pool entry per slot.
/// Entries are indexes into `domains`, so a domain can never be drawn more often than
/// it has slots.
#[must_use]
pub fn build_slot_pool(domains: &[DomainRecord]) -> Vec<usize> {
    domains
        .iter()
        .enumerate()
        .flat_map(|(i, domain)| std::iter::repeat_n(i, domain.slots as usize))
        .collect()
}

/// Shuffle the teams and the slot pool independently, then pop one slot off the end of
/// the pool for each team until one side runs out.
pub fn plan_domains<R: Rng + ?Sized>(
    teams: &[TeamRecord],
    domains: &[DomainRecord],
    rng: &mut R,
) -> AssignmentOutcome {
    if teams.is_empty() {
        return AssignmentOutcome::NothingToDo;
    }
    if domains.is_empty() {
        return AssignmentOutcome::CannotProceed {
            reason: "no domains were found".to_string(),
            unassigned: teams.to_vec(),
        };
    }

    let mut pool = build_slot_pool(domains);
    if pool.is_empty() {
        return AssignmentOutcome::CannotProceed {
            reason: "no domain has any open slots".to_string(),
            unassigned: teams.to_vec(),
        };
    }

    let mut order: Vec<&TeamRecord> = teams.iter().collect();
    order.shuffle(rng);
    pool.shuffle(rng);

    let mut counts = vec![0u32; domains.len()];
    let mut placements = Vec::with_capacity(teams.len().min(pool.len()));
    let mut unassigned = Vec::new();
    for team in order {
        match pool.pop() {
            Some(i) => {
                counts[i] += 1;
                placements.push(Placement {
                    team_id: team.team_id,
                    teamname: team.teamname.clone(),
                    value: domains[i].name.clone(),
                });
            }
            None => unassigned.push(team.clone()),
        }
    }

    let tallies = domains
        .iter()
        .zip(counts)
        .map(|(domain, assigned)| Tally {
            name: domain.name.clone(),
            assigned,
            capacity: domain.slots,
        })
        .collect();

    AssignmentOutcome::Planned(AssignmentPlan {
        placements,
        unassigned,
        tallies,
    })
}

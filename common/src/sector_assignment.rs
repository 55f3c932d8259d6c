//! Deal verified teams into sectors.

use crate::plan::{AssignmentOutcome, AssignmentPlan, Placement, Tally};
use crate::{SectorQuota, TeamRecord};
use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle the teams and give each one the first sector, in declared order, that is
/// still under its quota. Teams that find every sector full are left unassigned.
///
/// Any sector a team already has is ignored, so a new plan overwrites the old one.
pub fn plan_sectors<R: Rng + ?Sized>(
    teams: &[TeamRecord],
    sectors: &[SectorQuota],
    rng: &mut R,
) -> AssignmentOutcome {
    if teams.is_empty() {
        return AssignmentOutcome::NothingToDo;
    }
    let total_quota: u64 = sectors.iter().map(|s| u64::from(s.quota)).sum();
    if total_quota == 0 {
        let reason = if sectors.is_empty() {
            "no sectors are configured"
        } else {
            "every sector has a quota of zero"
        };
        return AssignmentOutcome::CannotProceed {
            reason: reason.to_string(),
            unassigned: teams.to_vec(),
        };
    }

    let mut order: Vec<&TeamRecord> = teams.iter().collect();
    order.shuffle(rng);

    let mut counts = vec![0u32; sectors.len()];
    let mut placements = Vec::with_capacity(teams.len());
    let mut unassigned = Vec::new();
    for team in order {
        let open_sector = sectors
            .iter()
            .zip(counts.iter_mut())
            .find(|(sector, count)| **count < sector.quota);
        match open_sector {
            Some((sector, count)) => {
                *count += 1;
                placements.push(Placement {
                    team_id: team.team_id,
                    teamname: team.teamname.clone(),
                    value: sector.name.clone(),
                });
            }
            None => unassigned.push(team.clone()),
        }
    }

    let tallies = sectors
        .iter()
        .zip(counts)
        .map(|(sector, assigned)| Tally {
            name: sector.name.clone(),
            assigned,
            capacity: sector.quota,
        })
        .collect();

    AssignmentOutcome::Planned(AssignmentPlan {
        placements,
        unassigned,
        tallies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn make_teams(n: u32) -> Vec<TeamRecord> {
        (1..=n)
            .map(|i| TeamRecord {
                team_id: i,
                teamname: format!("Team {i}"),
                verified: true,
                sector: Some("Itachi".to_string()),
                domain: None,
            })
            .collect()
    }

    fn unwrap_plan(outcome: AssignmentOutcome) -> AssignmentPlan {
        match outcome {
            AssignmentOutcome::Planned(plan) => plan,
            other => panic!("Expected a plan, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_sectors_capacity_exceeds_demand() {
        let teams = make_teams(25);
        let sectors = SectorQuota::defaults(20);
        let mut rng = StdRng::seed_from_u64(7);

        let plan = unwrap_plan(plan_sectors(&teams, &sectors, &mut rng));

        assert_eq!(plan.assigned_count(), 25);
        assert!(!plan.is_partial());
        // first sector fills before the next is touched
        let assigned: Vec<u32> = plan.tallies.iter().map(|t| t.assigned).collect();
        assert_eq!(assigned, vec![20, 5, 0]);
    }

    #[test]
    fn test_plan_sectors_respects_quota() {
        let teams = make_teams(50);
        let sectors = vec![
            SectorQuota::new("North", 10),
            SectorQuota::new("South", 3),
            SectorQuota::new("East", 15),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        let plan = unwrap_plan(plan_sectors(&teams, &sectors, &mut rng));

        assert_eq!(plan.assigned_count(), 28);
        assert_eq!(plan.unassigned.len(), 22);
        let mut per_sector: HashMap<&str, u32> = HashMap::new();
        for placement in &plan.placements {
            *per_sector.entry(placement.value.as_str()).or_insert(0) += 1;
        }
        for sector in &sectors {
            assert_eq!(per_sector[sector.name.as_str()], sector.quota);
        }

        // every team appears exactly once across placements and leftovers
        let mut seen = HashSet::new();
        for id in plan
            .placements
            .iter()
            .map(|p| p.team_id)
            .chain(plan.unassigned.iter().map(|t| t.team_id))
        {
            assert!(seen.insert(id));
        }
        assert_eq!(seen.len(), teams.len());
    }

    #[test]
    fn test_plan_sectors_is_shuffled() {
        let teams = make_teams(30);
        let sectors = vec![SectorQuota::new("Solo", 30)];
        let mut rng = StdRng::seed_from_u64(1);

        let plan = unwrap_plan(plan_sectors(&teams, &sectors, &mut rng));

        let order: Vec<u32> = plan.placements.iter().map(|p| p.team_id).collect();
        let fetch_order: Vec<u32> = teams.iter().map(|t| t.team_id).collect();
        assert_ne!(order, fetch_order);
    }

    #[test]
    fn test_plan_sectors_seeded_is_reproducible() {
        let teams = make_teams(12);
        let sectors = SectorQuota::defaults(4);

        let first = plan_sectors(&teams, &sectors, &mut StdRng::seed_from_u64(99));
        let second = plan_sectors(&teams, &sectors, &mut StdRng::seed_from_u64(99));

        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_sectors_overwrites_existing() {
        let teams = make_teams(3);
        let sectors = vec![SectorQuota::new("Naruto", 3)];
        let mut rng = StdRng::seed_from_u64(3);

        let plan = unwrap_plan(plan_sectors(&teams, &sectors, &mut rng));

        assert!(plan.placements.iter().all(|p| p.value == "Naruto"));
    }

    #[test]
    fn test_plan_sectors_no_teams() {
        let sectors = SectorQuota::defaults(20);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            plan_sectors(&[], &sectors, &mut rng),
            AssignmentOutcome::NothingToDo
        );
    }

    #[test]
    fn test_plan_sectors_zero_capacity() {
        let teams = make_teams(4);
        let mut rng = StdRng::seed_from_u64(0);

        for sectors in [Vec::new(), SectorQuota::defaults(0)] {
            match plan_sectors(&teams, &sectors, &mut rng) {
                AssignmentOutcome::CannotProceed { unassigned, .. } => {
                    assert_eq!(unassigned, teams);
                }
                other => panic!("Expected CannotProceed, got {other:?}"),
            }
        }
    }
}

use super::*;

diesel::table! {
    teams (id) {
        id -> Integer,
        teamname -> Varchar,
        verified -> Bool,
        sector -> Nullable<Varchar>,
        domain -> Nullable<Varchar>,
    }
}

#[derive(Queryable)]
#[diesel(table_name = teams)]
struct TeamPrivate {
    id: i32,
    teamname: String,
    verified: bool,
    sector: Option<String>,
    domain: Option<String>,
}

fn private_to_public(p: TeamPrivate) -> Result<TeamRecord> {
    use conversions::*;
    Ok(TeamRecord {
        team_id: i32_to_u32(p.id)?,
        teamname: p.teamname,
        verified: p.verified,
        sector: p.sector,
        domain: p.domain,
    })
}

/// Team ids and new values ready for binding.
fn placement_rows(placements: &[Placement]) -> Result<Vec<(i32, &str)>> {
    placements
        .iter()
        .map(|p| Ok((conversions::u32_to_i32(p.team_id)?, p.value.as_str())))
        .collect()
}

/// A placement must change exactly its own row. Anything else means the team
/// disappeared since it was read, and the whole batch has to roll back.
fn check_row_updated(row_id: i32, updated: usize) -> Result<()> {
    match updated {
        1 => Ok(()),
        0 => Err(anyhow!("Team #{row_id} no longer exists")),
        n => Err(anyhow!("Team #{row_id} matched {n} rows")),
    }
}

pub fn get_verified_teams(conn: &mut PgConnection) -> Result<Vec<TeamRecord>> {
    use self::teams::dsl::*;

    let items_private: Vec<TeamPrivate> = teams
        .filter(verified.eq(true))
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{e}"))?;

    items_private
        .into_iter()
        .map(private_to_public)
        .collect::<Result<Vec<TeamRecord>>>()
}

pub fn get_teams_without_domain(conn: &mut PgConnection) -> Result<Vec<TeamRecord>> {
    use self::teams::dsl::*;

    let items_private: Vec<TeamPrivate> = teams
        .filter(domain.is_null().or(domain.assume_not_null().eq("")))
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{e}"))?;

    items_private
        .into_iter()
        .map(private_to_public)
        .collect::<Result<Vec<TeamRecord>>>()
}

/// Overwrite the sector of every placed team in a single transaction.
/// Returns the number of rows updated. Nothing is saved if any team is missing.
pub fn update_team_sectors(conn: &mut PgConnection, placements: &[Placement]) -> Result<usize> {
    use self::teams::dsl::*;

    let rows = placement_rows(placements)?;
    conn.transaction::<usize, anyhow::Error, _>(|conn| {
        for (row_id, value) in &rows {
            let updated = diesel::update(teams.filter(id.eq(*row_id)))
                .set(sector.eq(Some(*value)))
                .execute(conn)
                .map_err(|e| anyhow!("{e}"))?;
            check_row_updated(*row_id, updated)?;
        }
        Ok(rows.len())
    })
}

/// Set the domain of every placed team in a single transaction.
/// Returns the number of rows updated. Nothing is saved if any team is missing.
pub fn update_team_domains(conn: &mut PgConnection, placements: &[Placement]) -> Result<usize> {
    use self::teams::dsl::*;

    let rows = placement_rows(placements)?;
    conn.transaction::<usize, anyhow::Error, _>(|conn| {
        for (row_id, value) in &rows {
            let updated = diesel::update(teams.filter(id.eq(*row_id)))
                .set(domain.eq(Some(*value)))
                .execute(conn)
                .map_err(|e| anyhow!("{e}"))?;
            check_row_updated(*row_id, updated)?;
        }
        Ok(rows.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_to_public() {
        let team = private_to_public(TeamPrivate {
            id: 14,
            teamname: "Stack Smashers".to_string(),
            verified: true,
            sector: Some("Sasuke".to_string()),
            domain: None,
        })
        .unwrap();
        assert_eq!(team.team_id, 14);
        assert!(team.needs_domain());

        let broken = TeamPrivate {
            id: -3,
            teamname: String::new(),
            verified: false,
            sector: None,
            domain: None,
        };
        assert!(private_to_public(broken).is_err());
    }

    #[test]
    fn test_placement_rows() {
        let placements = vec![Placement {
            team_id: 8,
            teamname: "Team 8".to_string(),
            value: "Itachi".to_string(),
        }];
        assert_eq!(placement_rows(&placements).unwrap(), vec![(8, "Itachi")]);
    }

    #[test]
    fn test_check_row_updated() {
        assert!(check_row_updated(3, 1).is_ok());

        let gone = check_row_updated(3, 0).unwrap_err();
        assert_eq!(gone.to_string(), "Team #3 no longer exists");
        assert!(check_row_updated(3, 2).is_err());
    }
}

use super::*;

diesel::table! {
    domains (id) {
        id -> Integer,
        name -> Varchar,
        slots -> Integer,
    }
}

#[derive(Queryable)]
#[diesel(table_name = domains)]
struct DomainPrivate {
    id: i32,
    name: String,
    slots: i32,
}

fn private_to_public(p: DomainPrivate) -> Result<DomainRecord> {
    use conversions::*;
    Ok(DomainRecord {
        domain_id: i32_to_u32(p.id)?,
        slots: i32_to_u32(p.slots)
            .with_context(|| format!("Domain '{}' has an invalid slot count", p.name))?,
        name: p.name,
    })
}

pub fn get_all_domains(conn: &mut PgConnection) -> Result<Vec<DomainRecord>> {
    use self::domains::dsl::*;

    let items_private: Vec<DomainPrivate> = domains
        .order(id.asc())
        .load(conn)
        .map_err(|e| anyhow!("{e}"))?;

    items_private
        .into_iter()
        .map(private_to_public)
        .collect::<Result<Vec<DomainRecord>>>()
}

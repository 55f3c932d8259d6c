//! Interfaces between the application code and database.

use crate::plan::Placement;
use crate::store::TeamStore;
use crate::{DomainRecord, TeamRecord};
use anyhow::{Context, Result, anyhow};
use clap::Args;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::info;

mod conversions;
mod domains;
mod teams;

pub use domains::get_all_domains;
pub use teams::{
    get_teams_without_domain, get_verified_teams, update_team_domains, update_team_sectors,
};

/// Connection settings shared by every job that talks to the database.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Database server URI, without the database name
    #[arg(long, default_value = "postgres://localhost:5432", env = "FORGE_DB_URI")]
    pub db_uri: String,

    /// Name of the database holding the teams and domains tables
    #[arg(long, default_value = "scorecraft-kare", env = "FORGE_DB_NAME")]
    pub db_name: String,
}

impl StoreArgs {
    /// Full connection URL made from the server URI and database name.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!("{}/{}", self.db_uri.trim_end_matches('/'), self.db_name)
    }
}

/// Open a connection to the database.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub fn get_database_connection(database_url: &str) -> Result<PgConnection> {
    PgConnection::establish(database_url)
        .map_err(|e| anyhow!("{e}"))
        .context("Database connection failed")
}

/// A [`TeamStore`] backed by Postgres.
/// Owns the connection for the whole run and closes it when dropped.
pub struct PgStore {
    conn: PgConnection,
    db_name: String,
}

impl PgStore {
    /// Connect using the shared store settings.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub fn connect(args: &StoreArgs) -> Result<Self> {
        let conn = get_database_connection(&args.database_url())?;
        info!("Connected to database '{}'.", args.db_name);
        Ok(Self {
            conn,
            db_name: args.db_name.clone(),
        })
    }
}

impl Drop for PgStore {
    fn drop(&mut self) {
        info!("Database connection to '{}' closed.", self.db_name);
    }
}

impl TeamStore for PgStore {
    fn verified_teams(&mut self) -> Result<Vec<TeamRecord>> {
        get_verified_teams(&mut self.conn)
    }

    fn teams_without_domain(&mut self) -> Result<Vec<TeamRecord>> {
        get_teams_without_domain(&mut self.conn)
    }

    fn all_domains(&mut self) -> Result<Vec<DomainRecord>> {
        get_all_domains(&mut self.conn)
    }

    fn write_sectors(&mut self, placements: &[Placement]) -> Result<usize> {
        update_team_sectors(&mut self.conn, placements)
    }

    fn write_domains(&mut self, placements: &[Placement]) -> Result<usize> {
        update_team_domains(&mut self.conn, placements)
    }
}

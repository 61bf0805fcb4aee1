use anyhow::Result;
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{Builder, ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use std::time::Duration;
use tracing::info;

use crate::config::config_model::Database;

/// Keeps the pool usable behind transaction-mode poolers (PgBouncer).
#[derive(Debug)]
struct DisablePreparedStatements;

impl CustomizeConnection<PgConnection, R2d2Error> for DisablePreparedStatements {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

fn pool_builder(database: &Database) -> Builder<ConnectionManager<PgConnection>> {
    Pool::builder()
        .max_size(database.max_connections)
        .connection_timeout(Duration::from_secs(database.connection_timeout))
        .connection_customizer(Box::new(DisablePreparedStatements))
}

pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    let pool = pool_builder(database).build(manager)?;

    info!(
        max_connections = database.max_connections,
        connection_timeout_secs = database.connection_timeout,
        "postgres: pool ready"
    );
    Ok(pool)
}

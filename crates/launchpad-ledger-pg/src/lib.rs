mod listener;
mod postgres;
mod utils;

use std::{ops::Deref, time::Duration};

use launchpad_config::Config;
use launchpad_ledger_interface::{LedgerError, Result};
use sqlx::{migrate::Migrate, postgres::PgPoolOptions, Acquire};

pub type LedgerPool = sqlx::postgres::PgPool;
pub use postgres::PostgresLedger;
use tracing::info;
pub use utils::{create_db_url, get_base_url, setup_test_db, teardown_test_db};

/// Channel used by `pg_notify` to publish ledger changes.
pub(crate) const CHANGES_CHANNEL: &str = "ledger_changes";

pub async fn run_migrations<'a, A>(migrator: A) -> Result<()>
where
    A: Acquire<'a>,
    <A::Connection as Deref>::Target: Migrate,
{
    info!("Running ledger migrations...");

    sqlx::migrate!("./migrations")
        .run(migrator)
        .await
        .map_err(|e| LedgerError::ImplementationError { source: e.into() })?;

    Ok(())
}

pub async fn establish_pool_connection(config: &Config) -> Result<LedgerPool> {
    info!("Establishing connection to ledger pool...");

    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(
            config.ledger.pg.connection_timeout.into(),
        ))
        .max_connections(config.ledger.pg.pool_size)
        .connect(&config.ledger.pg.url)
        .await
        .map_err(|e| LedgerError::ImplementationError { source: e.into() })
}

use launchpad_ledger_interface::{LedgerError, Result};
use sqlx::{Connection, PgConnection};

use crate::run_migrations;

fn wrap(e: sqlx::Error) -> LedgerError {
    LedgerError::ImplementationError { source: e.into() }
}

async fn create_connection(db_url: &str) -> Result<PgConnection> {
    PgConnection::connect(db_url).await.map_err(wrap)
}

async fn terminate_connections(conn: &mut PgConnection, db_name: &str) -> Result<()> {
    sqlx::query(
        r#"
        SELECT pg_terminate_backend(pg_stat_activity.pid)
        FROM pg_stat_activity
        WHERE datname = $1
        AND pid <> pg_backend_pid();
    "#,
    )
    .bind(db_name)
    .execute(conn)
    .await
    .map_err(wrap)?;

    Ok(())
}

async fn recreate_database(conn: &mut PgConnection, db_name: &str) -> Result<()> {
    sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{db_name}";"#))
        .execute(&mut *conn)
        .await
        .map_err(wrap)?;
    sqlx::query(&format!(r#"CREATE DATABASE "{db_name}";"#))
        .execute(&mut *conn)
        .await
        .map_err(wrap)?;

    Ok(())
}

pub fn get_base_url(url: &str) -> String {
    url.split('/').take(3).collect::<Vec<_>>().join("/")
}

pub fn create_db_url(base_url: &str, db_name: &str) -> String {
    format!("{base_url}/{db_name}")
}

/// Create a fresh migrated database.
pub async fn setup_test_db(base_url: &str, db_name: &str) -> Result<()> {
    {
        let mut conn = create_connection(&create_db_url(base_url, "postgres")).await?;
        terminate_connections(&mut conn, db_name).await?;
        recreate_database(&mut conn, db_name).await?;
    }

    let mut conn = create_connection(&create_db_url(base_url, db_name)).await?;
    run_migrations(&mut conn).await
}

pub async fn teardown_test_db(base_url: &str, db_name: &str) -> Result<()> {
    let mut conn = create_connection(&create_db_url(base_url, "postgres")).await?;
    terminate_connections(&mut conn, db_name).await?;
    sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{db_name}";"#))
        .execute(&mut conn)
        .await
        .map_err(wrap)?;

    Ok(())
}

//! Shared embedded PostgreSQL helpers for integration tests.
//!
//! Database reset uses `postgres` directly to avoid Diesel transaction
//! semantics interfering with `DROP DATABASE`; schema setup runs the real
//! embedded migrations so test schemas never drift from production.

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn validate_pg_identifier(name: &str) -> Result<(), String> {
    let is_valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if is_valid {
        Ok(())
    } else {
        Err(format!("invalid database identifier: {name}"))
    }
}

/// Drops and recreates `db_name` within the embedded cluster.
pub fn reset_database(cluster: &TestCluster, db_name: &str) -> Result<(), String> {
    validate_pg_identifier(db_name)?;

    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;

    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{db_name}\";"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{db_name}\";"))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Runs all pending migrations from `backend/migrations` against `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("{err:?}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err:?}"))?;
    Ok(())
}

/// Drops the `endpoints` table, used to exercise record-store failure paths
/// when the schema is missing.
pub fn drop_endpoints_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("DROP TABLE IF EXISTS endpoints CASCADE;")
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

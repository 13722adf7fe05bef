use std::str::FromStr;

use sea_orm::{ConnectionTrait, DatabaseConnection, SqlxSqliteConnector, Statement};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{WarehouseError, WarehouseResult};

pub type DbPool = SqlitePool;
pub type OrmConn = DatabaseConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Creates the database file when it does not exist yet.
    ReadWrite,
    ReadOnly,
}

pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    name: "0001_star_schema.sql",
    sql: include_str!("../migrations/0001_star_schema.sql"),
}];

/// Open a single-connection SQLite pool with foreign keys enforced.
///
/// The pool never recycles its connection, so `sqlite::memory:` databases
/// live as long as the pool does.
pub async fn create_pool(database_url: &str, mode: AccessMode) -> WarehouseResult<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(mode == AccessMode::ReadWrite)
        .read_only(mode == AccessMode::ReadOnly)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Wrap an existing pool in a SeaORM connection so both share one handle.
pub fn create_orm_conn(pool: DbPool) -> OrmConn {
    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

/// Execute the embedded migrations in order. Every statement is
/// create-if-absent, so running this against an initialised store is a no-op.
pub async fn run_migrations(conn: &OrmConn) -> WarehouseResult<usize> {
    let backend = conn.get_database_backend();
    let mut executed = 0;

    for migration in MIGRATIONS {
        for stmt in split_statements(migration.sql) {
            conn.execute(Statement::from_string(backend, format!("{stmt};")))
                .await
                .map_err(|source| WarehouseError::Schema {
                    migration: migration.name.to_string(),
                    source,
                })?;
            executed += 1;
        }
        tracing::debug!(migration = migration.name, "migration applied");
    }

    Ok(executed)
}

// SQLite prepared statements run one command at a time, so the file is split
// on `;` after dropping `--` comment lines.
fn split_statements(sql: &str) -> Vec<String> {
    let without_comments: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

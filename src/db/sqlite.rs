//! Connection plumbing shared by both store files.
//!
//! Each file keeps its own `schema_version` table and migration chain;
//! this module only knows how to open a connection and walk a chain.

use std::path::Path;

use rusqlite::Connection;
use tracing;

use super::DatabaseError;

/// A numbered migration script.
pub type Migration = (i64, &'static str);

/// Open a SQLite file (creating its parent directory) and run `migrations`.
pub fn open_database(
    path: &Path,
    migrations: &[Migration],
    label: &str,
) -> Result<Connection, DatabaseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn, migrations, label)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database(
    migrations: &[Migration],
    label: &str,
) -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn, migrations, label)?;
    Ok(conn)
}

pub(crate) fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// Run all pending migrations of one chain
pub fn run_migrations(
    conn: &Connection,
    migrations: &[Migration],
    label: &str,
) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    for &(version, sql) in migrations {
        if version > current_version {
            tracing::info!(store = label, "Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
pub fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

/// Column names of `table`, in declaration order.
pub fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

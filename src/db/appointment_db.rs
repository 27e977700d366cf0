//! Appointment store database: `appointments.db`.
//!
//! Files written by earlier builds may carry an `appointments` table
//! missing some of the columns below. Those are added on open, before
//! any query touches them.

use std::path::Path;

use rusqlite::Connection;
use tracing;

use super::sqlite::{self, Migration};
use super::DatabaseError;

const APPOINTMENT_MIGRATIONS: &[Migration] = &[(
    1,
    include_str!("../../resources/migrations/appointments/001_appointments.sql"),
)];

/// Columns every appointments table must expose.
pub const APPOINTMENT_COLUMNS: &[&str] = &["name", "contact", "date", "time", "user_type"];

/// Open (or create) the appointment database, run migrations, and
/// backfill missing legacy columns.
pub fn open_appointment_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = sqlite::open_database(path, APPOINTMENT_MIGRATIONS, "appointments")?;
    ensure_appointment_columns(&conn)?;
    Ok(conn)
}

/// Open an in-memory appointment database (for testing).
pub fn open_memory_appointment_database() -> Result<Connection, DatabaseError> {
    let conn = sqlite::open_memory_database(APPOINTMENT_MIGRATIONS, "appointments")?;
    ensure_appointment_columns(&conn)?;
    Ok(conn)
}

/// Add any of [`APPOINTMENT_COLUMNS`] the table lacks, as nullable TEXT.
/// Returns the names of the columns that were added.
pub fn ensure_appointment_columns(conn: &Connection) -> Result<Vec<&'static str>, DatabaseError> {
    let existing = sqlite::column_names(conn, "appointments")?;
    let mut added = Vec::new();

    for &column in APPOINTMENT_COLUMNS {
        if !existing.iter().any(|c| c == column) {
            conn.execute_batch(&format!("ALTER TABLE appointments ADD COLUMN {column} TEXT"))?;
            added.push(column);
        }
    }

    if !added.is_empty() {
        tracing::info!(columns = ?added, "Upgraded legacy appointments table");
    }
    Ok(added)
}

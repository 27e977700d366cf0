use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_appointment(
    conn: &Connection,
    appointment: &NewAppointment,
    role: Role,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (name, contact, date, time, user_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment.name,
            appointment.contact,
            appointment.date,
            appointment.time,
            role.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every row created from a Patient session, oldest first.
pub fn get_patient_authored_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT rowid, name, contact, date, time, user_type
         FROM appointments WHERE user_type = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![Role::Patient.as_str()], read_row)?;
    appointment_rows_to_vec(rows)
}

/// Rows whose name equals `name` exactly, oldest first.
pub fn get_appointments_by_name(conn: &Connection, name: &str) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT rowid, name, contact, date, time, user_type
         FROM appointments WHERE name = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![name], read_row)?;
    appointment_rows_to_vec(rows)
}

/// Removes every row matching all four fields. Returns the number removed.
pub fn delete_appointments_by_fields(
    conn: &Connection,
    name: &str,
    contact: &str,
    date: &str,
    time: &str,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM appointments WHERE name = ?1 AND contact = ?2 AND date = ?3 AND time = ?4",
        params![name, contact, date, time],
    )?;
    Ok(deleted)
}

/// Ids are rowids, so tables written without an `id` column still work.
pub fn delete_appointment(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM appointments WHERE rowid = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_appointments(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
    Ok(count)
}

type AppointmentRow = (
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn appointment_rows_to_vec(
    rows: impl Iterator<Item = rusqlite::Result<AppointmentRow>>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut result = Vec::new();
    for row in rows {
        let (id, name, contact, date, time, user_type) = row?;
        result.push(Appointment {
            id,
            name: name.unwrap_or_default(),
            contact: contact.unwrap_or_default(),
            date: date.unwrap_or_default(),
            time: time.unwrap_or_default(),
            role: user_type.as_deref().map(Role::from_str).transpose()?,
        });
    }
    Ok(result)
}

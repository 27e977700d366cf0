//! Scoped store handles.
//!
//! `AccountStore` and `AppointmentStore` each own one SQLite connection.
//! A handle is acquired when a flow starts and the connection is closed
//! when the handle drops, whichever way the flow exits.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::flow::FlowError;
use crate::models::{Account, Appointment, NewAppointment, Role};

// ═══════════════════════════════════════════════════════════
// Account store
// ═══════════════════════════════════════════════════════════

pub struct AccountStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl AccountStore {
    /// Open the account store at `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_account_database(path)?;
        tracing::info!(path = %path.display(), "Account store opened");
        Ok(Self {
            conn,
            path: Some(path.to_owned()),
        })
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: db::open_memory_account_database()?,
            path: None,
        })
    }

    /// Persist a new account. Usernames are unique across both roles.
    pub fn create_account(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<(), FlowError> {
        if db::username_exists(&self.conn, username)? {
            return Err(FlowError::DuplicateUsername(username.to_string()));
        }

        let account = Account {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        match db::insert_account(&self.conn, &account) {
            Ok(()) => {}
            // Another process won the race between the lookup and the insert
            Err(DatabaseError::ConstraintViolation(_)) => {
                return Err(FlowError::DuplicateUsername(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(%username, %role, "Account created");
        Ok(())
    }

    /// Find an account registered under exactly this username and role.
    pub fn find_account(&self, username: &str, role: Role) -> Result<Option<Account>, DatabaseError> {
        db::get_account_by_username_and_role(&self.conn, username, role)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for AccountStore {
    fn drop(&mut self) {
        tracing::debug!(path = ?self.path, "Account store released");
    }
}

// ═══════════════════════════════════════════════════════════
// Appointment store
// ═══════════════════════════════════════════════════════════

pub struct AppointmentStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl AppointmentStore {
    /// Open the appointment store at `path`, creating or upgrading it.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_appointment_database(path)?;
        tracing::info!(path = %path.display(), "Appointment store opened");
        Ok(Self {
            conn,
            path: Some(path.to_owned()),
        })
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: db::open_memory_appointment_database()?,
            path: None,
        })
    }

    /// Store a new appointment tagged with the creating role. Returns its id.
    pub fn insert(&self, appointment: &NewAppointment, role: Role) -> Result<i64, DatabaseError> {
        let id = db::insert_appointment(&self.conn, appointment, role)?;
        tracing::info!(id, %role, "Appointment created");
        Ok(id)
    }

    /// Doctor: every Patient-authored row, `name_filter` ignored.
    /// Patient: rows whose name equals `name_filter` exactly.
    pub fn list_for_role(&self, role: Role, name_filter: &str) -> Result<Vec<Appointment>, DatabaseError> {
        match role {
            Role::Doctor => db::get_patient_authored_appointments(&self.conn),
            Role::Patient => db::get_appointments_by_name(&self.conn, name_filter),
        }
    }

    /// Remove every row matching all four fields. Zero matches is not an error.
    pub fn delete_by_fields(
        &self,
        name: &str,
        contact: &str,
        date: &str,
        time: &str,
    ) -> Result<(), DatabaseError> {
        let removed = db::delete_appointments_by_fields(&self.conn, name, contact, date, time)?;
        tracing::info!(removed, "Appointments deleted by field match");
        Ok(())
    }

    /// Remove the single row with this id.
    pub fn delete_by_id(&self, id: i64) -> Result<(), DatabaseError> {
        db::delete_appointment(&self.conn, id)?;
        tracing::info!(id, "Appointment deleted");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for AppointmentStore {
    fn drop(&mut self) {
        tracing::debug!(path = ?self.path, "Appointment store released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(name: &str, contact: &str, date: &str, time: &str) -> NewAppointment {
        NewAppointment {
            name: name.into(),
            contact: contact.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    #[test]
    fn duplicate_username_rejected_regardless_of_role() {
        let store = AccountStore::open_in_memory().unwrap();
        store.create_account("sam", "pw", Role::Patient).unwrap();

        for role in Role::ALL {
            let err = store.create_account("sam", "other", role).unwrap_err();
            assert!(matches!(err, FlowError::DuplicateUsername(ref u) if u == "sam"));
        }
        assert_eq!(db::count_accounts(store.connection()).unwrap(), 1);
    }

    #[test]
    fn find_account_is_role_scoped() {
        let store = AccountStore::open_in_memory().unwrap();
        store.create_account("drlee", "pw", Role::Doctor).unwrap();

        assert!(store.find_account("drlee", Role::Doctor).unwrap().is_some());
        assert!(store.find_account("drlee", Role::Patient).unwrap().is_none());
    }

    #[test]
    fn listing_by_role() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store
            .insert(&visit("Alice", "555", "2024-01-01", "09:00"), Role::Patient)
            .unwrap();

        let doctor = store.list_for_role(Role::Doctor, "").unwrap();
        assert!(doctor.iter().any(|a| a.name == "Alice" && a.contact == "555"));

        let alice = store.list_for_role(Role::Patient, "Alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].date, "2024-01-01");
        assert_eq!(alice[0].time, "09:00");

        assert!(store.list_for_role(Role::Patient, "Bob").unwrap().is_empty());
    }

    #[test]
    fn doctor_listing_ignores_filter() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store.insert(&visit("Alice", "1", "2024-01-01", "09:00"), Role::Patient).unwrap();
        store.insert(&visit("Bob", "2", "2024-01-01", "10:00"), Role::Patient).unwrap();

        assert_eq!(store.list_for_role(Role::Doctor, "Alice").unwrap().len(), 2);
    }

    #[test]
    fn doctor_listing_skips_doctor_rows() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store.insert(&visit("Alice", "1", "2024-01-01", "09:00"), Role::Doctor).unwrap();
        assert!(store.list_for_role(Role::Doctor, "").unwrap().is_empty());
    }

    #[test]
    fn delete_by_fields_removes_both_duplicates() {
        let store = AppointmentStore::open_in_memory().unwrap();
        let v = visit("Alice", "555", "2024-01-01", "09:00");
        store.insert(&v, Role::Patient).unwrap();
        store.insert(&v, Role::Patient).unwrap();

        store.delete_by_fields("Alice", "555", "2024-01-01", "09:00").unwrap();
        assert!(store.list_for_role(Role::Patient, "Alice").unwrap().is_empty());

        // Nothing left to match; still Ok
        store.delete_by_fields("Alice", "555", "2024-01-01", "09:00").unwrap();
    }

    #[test]
    fn delete_by_id_keeps_other_duplicate() {
        let store = AppointmentStore::open_in_memory().unwrap();
        let v = visit("Alice", "555", "2024-01-01", "09:00");
        let first = store.insert(&v, Role::Patient).unwrap();
        store.insert(&v, Role::Patient).unwrap();

        store.delete_by_id(first).unwrap();
        assert_eq!(store.list_for_role(Role::Patient, "Alice").unwrap().len(), 1);
    }

    #[test]
    fn opens_table_written_without_id_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.db");
        {
            let legacy = Connection::open(&path).unwrap();
            legacy
                .execute_batch(
                    "CREATE TABLE appointments (name TEXT, contact TEXT);
                     INSERT INTO appointments (name, contact) VALUES ('Alice', '555');",
                )
                .unwrap();
        }

        let store = AppointmentStore::open(&path).unwrap();
        assert_eq!(store.list_for_role(Role::Patient, "Alice").unwrap().len(), 1);

        let id = store
            .insert(&visit("Bob", "777", "2024-01-01", "09:00"), Role::Patient)
            .unwrap();
        let doctor = store.list_for_role(Role::Doctor, "").unwrap();
        assert_eq!(doctor.len(), 1);
        assert_eq!(doctor[0].id, id);
    }

    #[test]
    fn stores_persist_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let users = dir.path().join("users.db");
        let appts = dir.path().join("appointments.db");

        {
            let accounts = AccountStore::open(&users).unwrap();
            accounts.create_account("ana", "pw", Role::Patient).unwrap();
            let appointments = AppointmentStore::open(&appts).unwrap();
            appointments
                .insert(&visit("Ana", "9", "2024-03-03", "08:30"), Role::Patient)
                .unwrap();
        }

        let accounts = AccountStore::open(&users).unwrap();
        assert_eq!(accounts.path(), Some(users.as_path()));
        assert!(accounts.find_account("ana", Role::Patient).unwrap().is_some());
        let appointments = AppointmentStore::open(&appts).unwrap();
        assert_eq!(appointments.list_for_role(Role::Doctor, "").unwrap().len(), 1);
    }
}

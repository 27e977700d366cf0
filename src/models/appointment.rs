use serde::{Deserialize, Serialize};

use super::enums::Role;

/// A stored appointment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub date: String, // YYYY-MM-DD, unvalidated
    pub time: String, // HH:MM, unvalidated
    /// Role of the session that created the row. `None` for legacy rows
    /// written before the `user_type` column existed.
    pub role: Option<Role>,
}

/// Field values of an appointment that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub name: String,
    pub contact: String,
    pub date: String,
    pub time: String,
}

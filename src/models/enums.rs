use std::fmt;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Who is using the application. Persisted verbatim in `user_type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Doctor, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Doctor" => Ok(Self::Doctor),
            "Patient" => Ok(Self::Patient),
            _ => Err(DatabaseError::InvalidEnum {
                field: "Role".into(),
                value: s.into(),
            }),
        }
    }
}

use serde::{Deserialize, Serialize};

use super::enums::Role;

/// A login identity. The password is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub role: Role,
}

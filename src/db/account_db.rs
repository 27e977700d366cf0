//! Account store database: `users.db`.

use std::path::Path;

use rusqlite::Connection;

use super::sqlite::{self, Migration};
use super::DatabaseError;

const ACCOUNT_MIGRATIONS: &[Migration] = &[(
    1,
    include_str!("../../resources/migrations/users/001_users.sql"),
)];

/// Open (or create) the account database and run migrations.
pub fn open_account_database(path: &Path) -> Result<Connection, DatabaseError> {
    sqlite::open_database(path, ACCOUNT_MIGRATIONS, "users")
}

/// Open an in-memory account database (for testing).
pub fn open_memory_account_database() -> Result<Connection, DatabaseError> {
    sqlite::open_memory_database(ACCOUNT_MIGRATIONS, "users")
}

use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, password, user_type) VALUES (?1, ?2, ?3)",
        params![account.username, account.password, account.role.as_str()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!(
                "username already taken: {}",
                account.username
            ))
        }
        other => DatabaseError::Sqlite(other),
    })?;
    Ok(())
}

/// True when any account, of either role, uses `username`.
pub fn username_exists(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            params![username],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Looks up an account by username within one role only.
pub fn get_account_by_username_and_role(
    conn: &Connection,
    username: &str,
    role: Role,
) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT username, password, user_type FROM users
             WHERE username = ?1 AND user_type = ?2",
            params![username, role.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((username, password, user_type)) => Ok(Some(Account {
            username,
            password: password.unwrap_or_default(),
            role: Role::from_str(&user_type)?,
        })),
        None => Ok(None),
    }
}

pub fn count_accounts(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

//! User-facing flows: authentication and the role-specific appointment screen.
//!
//! Every `FlowError` is terminal to the current user action only. The
//! presentation layer shows it as a blocking notice and waits for the
//! user to try again.

pub mod appointment;
pub mod auth;

pub use appointment::*;
pub use auth::*;

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Please fill all fields ({field} is empty).")]
    MissingRequiredField { field: &'static str },

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Username not found. Please create an account.")]
    UnknownUsername,

    #[error("Incorrect password.")]
    WrongPassword,

    #[error("Please select an appointment first.")]
    NoSelectionMade,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Presence check shared by every form. Only the empty string is blank;
/// whitespace is a value like any other.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), FlowError> {
    if value.is_empty() {
        return Err(FlowError::MissingRequiredField { field });
    }
    Ok(())
}

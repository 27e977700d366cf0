//! Repository layer: table-scoped database operations.
//!
//! Accounts live in `users.db`, appointments in `appointments.db`; each
//! function takes the connection of the file it belongs to.

mod account;
mod appointment;

pub use account::*;
pub use appointment::*;

pub mod config;
pub mod console;
pub mod db;
pub mod flow;
pub mod models;
pub mod store;

use std::io;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::store::{AccountStore, AppointmentStore};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not open store: {0}")]
    Database(#[from] db::DatabaseError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Appointment Manager starting v{}", config::APP_VERSION);

    // Both handles drop, closing their connections, on every return path
    let accounts = AccountStore::open(&config::users_db_path())?;
    let appointments = AppointmentStore::open(&config::appointments_db_path())?;

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    console.run(&accounts, &appointments)?;

    tracing::info!("Appointment Manager exiting");
    Ok(())
}

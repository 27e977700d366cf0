use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AppointmentManager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Account store file name, relative to the data directory
pub const USERS_DB_FILE: &str = "users.db";

/// Appointment store file name, relative to the data directory
pub const APPOINTMENTS_DB_FILE: &str = "appointments.db";

/// Log filter used when `RUST_LOG` is unset. Quiet by default so log
/// lines do not interleave with the terminal screens.
pub fn default_log_filter() -> &'static str {
    "appointment_manager_lib=warn,appointment_manager=warn,warn"
}

/// Get the application data directory
/// ~/AppointmentManager/, or the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => PathBuf::from("."),
    }
}

/// Path of the account store
pub fn users_db_path() -> PathBuf {
    app_data_dir().join(USERS_DB_FILE)
}

/// Path of the appointment store
pub fn appointments_db_path() -> PathBuf {
    app_data_dir().join(APPOINTMENTS_DB_FILE)
}

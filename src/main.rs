fn main() {
    if let Err(e) = appointment_manager_lib::run() {
        eprintln!("appointment-manager: {e}");
        std::process::exit(1);
    }
}

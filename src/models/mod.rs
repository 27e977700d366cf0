pub mod account;
pub mod appointment;
pub mod enums;

pub use account::*;
pub use appointment::*;
pub use enums::Role;

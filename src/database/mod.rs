pub mod locations;
pub mod manager;
pub mod users;

pub use manager::{connect, health_check, DatabaseError};

pub mod checkin;
pub mod clock;
pub mod config;
pub mod error;
pub mod habit;
pub mod io;
pub mod paths;
pub mod period;
pub mod progress;
pub mod store;
pub mod tracker;
pub mod types;
pub mod workspace;

pub use error::{HabitError, Result};
pub use tracker::Tracker;
